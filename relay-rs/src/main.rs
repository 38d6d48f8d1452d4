use relay_rs::api::ApiServer;
use relay_rs::config::Config;
use relay_rs::filter::dns::TrustDnsResolver;
use relay_rs::filter::EmailFilter;
use relay_rs::mailer::SmtpMailer;
use std::sync::Arc;
use tracing::{info, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional config path as the first argument
    let args: Vec<String> = std::env::args().collect();
    let config_path = args.get(1).map(String::as_str).unwrap_or("config.toml");

    let mut config = if std::path::Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        Config::default()
    };
    config.apply_env_overrides();

    // Initialize logging per config
    let level = config
        .logging
        .level
        .parse::<Level>()
        .unwrap_or(Level::INFO);

    if config.logging.format == "json" {
        tracing_subscriber::fmt().with_max_level(level).json().init();
    } else {
        tracing_subscriber::fmt().with_max_level(level).pretty().init();
    }

    info!("Starting relay-rs");
    info!("  Listening on: {}", config.server.listen_addr);
    info!("  Notifications to: {}", config.forms.notify_address);
    info!("  SMTP relay: {}:{}", config.smtp.host, config.smtp.port);
    info!("  DNS verification: {}", config.filter.verify_dns);

    let resolver = Arc::new(TrustDnsResolver::new());
    let filter = EmailFilter::new(config.filter.verify_dns, resolver)?;
    let mailer = Arc::new(SmtpMailer::new(&config.smtp)?);

    let server = ApiServer::new(&config, filter, mailer);
    server.run().await?;

    Ok(())
}
