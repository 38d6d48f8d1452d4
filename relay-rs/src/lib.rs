//! relay-rs: stateless form-to-email relay
//!
//! Accepts HTTP submissions from web forms (contact and
//! newsletter-subscribe) and relays them as outbound email to a fixed
//! notification address, with a confirmation sent back to the
//! submitter. Nothing is stored; the SMTP transport is the only
//! external effect.
//!
//! # Features
//!
//! - **Acceptability filter**: ordered heuristic checks (format,
//!   length, role accounts, disposable domains, optional DNS
//!   verification) decide whether an address is worth sending mail to
//! - **Stable rejection codes**: every rejection maps to a fixed
//!   code/message/field triple safe to show to end users
//! - **Single-attempt delivery**: send-or-fail, no queue, no retry
//!
//! # Example
//!
//! ```no_run
//! use relay_rs::api::ApiServer;
//! use relay_rs::config::Config;
//! use relay_rs::filter::dns::TrustDnsResolver;
//! use relay_rs::filter::EmailFilter;
//! use relay_rs::mailer::SmtpMailer;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!
//!     let resolver = Arc::new(TrustDnsResolver::new());
//!     let filter = EmailFilter::new(config.filter.verify_dns, resolver)?;
//!     let mailer = Arc::new(SmtpMailer::new(&config.smtp)?);
//!
//!     let server = ApiServer::new(&config, filter, mailer);
//!     server.run().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling
//! - [`filter`]: Email acceptability filter and rejection mapping
//! - [`mailer`]: Outbound mail transport and templates
//! - [`api`]: HTTP server and form handlers

pub mod api;
pub mod config;
pub mod error;
pub mod filter;
pub mod mailer;

// Re-export commonly used types
pub use config::Config;
pub use error::{RelayError, Result};
