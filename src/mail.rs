//! Outbound mail — SMTP via lettre.

use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use secrecy::{ExposeSecret, SecretString};

use crate::error::{ConfigError, MailError};

/// Narrow outbound transport seam. Delivery is synchronous per message; no
/// retry is attempted.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError>;
}

/// SMTP relay configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// Sender address, also used as the relay login.
    pub from_address: String,
    pub password: SecretString,
}

impl SmtpConfig {
    /// Build config from environment variables.
    ///
    /// `EMAIL_ADDRESS` and `EMAIL_PASSWORD` are required; host and port
    /// default to Gmail's SMTPS endpoint.
    pub fn from_env() -> Result<Self, ConfigError> {
        let from_address = std::env::var("EMAIL_ADDRESS")
            .map_err(|_| ConfigError::MissingEnvVar("EMAIL_ADDRESS".to_string()))?;
        let password = std::env::var("EMAIL_PASSWORD")
            .map_err(|_| ConfigError::MissingEnvVar("EMAIL_PASSWORD".to_string()))?;

        let host =
            std::env::var("EMAIL_SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string());
        let port: u16 = match std::env::var("EMAIL_SMTP_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "EMAIL_SMTP_PORT".to_string(),
                message: format!("not a port number: {raw}"),
            })?,
            Err(_) => 465,
        };

        Ok(Self {
            host,
            port,
            from_address,
            password: SecretString::from(password),
        })
    }
}

/// SMTP mailer over a TLS relay.
pub struct SmtpMailer {
    config: SmtpConfig,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let creds = Credentials::new(
            self.config.from_address.clone(),
            self.config.password.expose_secret().to_string(),
        );

        let transport = SmtpTransport::relay(&self.config.host)
            .map_err(|e| MailError::Relay(e.to_string()))?
            .port(self.config.port)
            .credentials(creds)
            .build();

        let email = Message::builder()
            .from(
                self.config
                    .from_address
                    .parse()
                    .map_err(|e| MailError::InvalidAddress {
                        address: self.config.from_address.clone(),
                        reason: format!("{e}"),
                    })?,
            )
            .to(to.parse().map_err(|e| MailError::InvalidAddress {
                address: to.to_string(),
                reason: format!("{e}"),
            })?)
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| MailError::Build(e.to_string()))?;

        transport
            .send(&email)
            .map_err(|e| MailError::Send(e.to_string()))?;

        tracing::info!(to = %to, "Email sent");
        Ok(())
    }
}
