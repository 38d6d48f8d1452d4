//! Outbound mail transport
//!
//! One send per call, no queue and no retry: if the SMTP conversation
//! fails the error surfaces to the caller and the request is over. The
//! transport sits behind a trait so handler tests can record sends
//! instead of opening sockets.

pub mod templates;

pub use templates::{ContactSubmission, RenderedEmail, SubscribeSubmission};

use crate::config::SmtpConfig;
use crate::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;
use uuid::Uuid;

/// A fully rendered message ready for the wire
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    /// Set on admin notifications so replying reaches the submitter
    pub reply_to: Option<String>,
    pub subject: String,
    pub body_text: String,
    pub body_html: Option<String>,
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<()>;
}

/// SMTP transport over a configured relay host
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build the transport from `[smtp]` configuration
    ///
    /// With credentials the connection goes through STARTTLS; without,
    /// a plain connection for local relays.
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let transport = match (&config.username, &config.password) {
            (Some(username), Some(password)) => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
                    .port(config.port)
                    .credentials(Credentials::new(username.clone(), password.clone()))
                    .build()
            }
            _ => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                .port(config.port)
                .build(),
        };

        let from: Mailbox =
            format!("{} <{}>", config.from_name, config.from_address).parse()?;

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        let message_id = format!(
            "<{}.{}@relay-rs>",
            Uuid::new_v4(),
            Utc::now().timestamp()
        );

        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(email.to.parse::<Mailbox>()?)
            .subject(email.subject.clone())
            .message_id(Some(message_id))
            .date_now();

        if let Some(reply_to) = &email.reply_to {
            builder = builder.reply_to(reply_to.parse::<Mailbox>()?);
        }

        let message = match &email.body_html {
            Some(html) => builder.multipart(MultiPart::alternative_plain_html(
                email.body_text.clone(),
                html.clone(),
            ))?,
            None => builder
                .header(ContentType::TEXT_PLAIN)
                .body(email.body_text.clone())?,
        };

        self.transport.send(message).await?;

        info!("Sent \"{}\" to {}", email.subject, email.to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SmtpConfig;

    fn smtp_config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.fastmail.com".to_string(),
            port: 587,
            username: Some("relay".to_string()),
            password: Some("secret".to_string()),
            from_address: "forms@acme.dev".to_string(),
            from_name: "Acme Forms".to_string(),
        }
    }

    #[tokio::test]
    async fn test_build_mailer_with_credentials() {
        assert!(SmtpMailer::new(&smtp_config()).is_ok());
    }

    #[tokio::test]
    async fn test_build_mailer_plain() {
        let mut config = smtp_config();
        config.username = None;
        config.password = None;
        config.host = "localhost".to_string();
        config.port = 25;
        assert!(SmtpMailer::new(&config).is_ok());
    }

    #[tokio::test]
    async fn test_invalid_from_address_rejected() {
        let mut config = smtp_config();
        config.from_address = "not an address".to_string();
        assert!(SmtpMailer::new(&config).is_err());
    }
}
