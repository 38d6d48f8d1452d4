use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub smtp: SmtpConfig,
    pub forms: FormsConfig,
    pub filter: FilterConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub listen_addr: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Envelope/header From for all outbound mail
    pub from_address: String,
    pub from_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FormsConfig {
    /// Address that receives admin notifications for every submission
    pub notify_address: String,
    /// Site name used in outbound subjects and bodies
    pub site_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FilterConfig {
    /// Verify submitter domains against DNS (MX with A/AAAA fallback)
    #[serde(default)]
    pub verify_dns: bool,
    /// Include the raw internal rejection reason in 422 bodies (debug only)
    #[serde(default)]
    pub expose_reasons: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::error::RelayError::Config(e.to_string()))?;

        toml::from_str(&content)
            .map_err(|e| crate::error::RelayError::Config(e.to_string()))
    }

    pub fn default() -> Self {
        Self {
            server: ServerConfig {
                listen_addr: "0.0.0.0:8080".to_string(),
            },
            smtp: SmtpConfig {
                host: "localhost".to_string(),
                port: 25,
                username: None,
                password: None,
                from_address: "forms@localhost".to_string(),
                from_name: "Form Relay".to_string(),
            },
            forms: FormsConfig {
                notify_address: "admin@localhost".to_string(),
                site_name: "localhost".to_string(),
            },
            filter: FilterConfig {
                verify_dns: false,
                expose_reasons: false,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }

    /// Apply environment overrides for the runtime toggles
    ///
    /// `RELAY_VERIFY_DNS` and `RELAY_EXPOSE_REASONS` accept "1", "true"
    /// or "yes" (case-insensitive); any other value disables the toggle.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var("RELAY_VERIFY_DNS") {
            self.filter.verify_dns = parse_bool(&value);
        }
        if let Ok(value) = std::env::var("RELAY_EXPOSE_REASONS") {
            self.filter.expose_reasons = parse_bool(&value);
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}
