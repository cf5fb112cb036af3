//! Outbound mail relay.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::{ConfigError, MailConfig};
use crate::errors::AppError;

const DISPATCH_FAILED: &str = "Failed to send emails";

/// A fully composed message, independent of the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from_name: String,
    pub recipients: Vec<String>,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Accepts a message for delivery or reports why it could not.
#[async_trait]
pub trait MailRelay: Send + Sync + 'static {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), AppError>;
}

/// SMTP relay over implicit TLS.
pub struct SmtpRelay {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Address,
}

impl SmtpRelay {
    /// Build a relay from configuration, or `None` when no sender account is set.
    pub fn from_config(config: &MailConfig) -> Result<Option<Self>, ConfigError> {
        let Some(username) = &config.username else {
            return Ok(None);
        };

        let sender: Address = username
            .parse()
            .map_err(|e| ConfigError(format!("invalid EMAIL_USER: {e}")))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| ConfigError(format!("invalid SMTP_HOST: {e}")))?
            .timeout(Some(config.timeout));

        if let Some(password) = &config.password {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Some(Self {
            transport: builder.build(),
            sender,
        }))
    }

    fn build_message(&self, mail: &OutgoingMail) -> Result<Message, AppError> {
        let mut builder = Message::builder()
            .from(Mailbox::new(Some(mail.from_name.clone()), self.sender.clone()))
            .subject(mail.subject.clone());

        for recipient in &mail.recipients {
            let mailbox: Mailbox = recipient
                .parse()
                .map_err(|_| AppError::Validation(format!("Invalid email address: {}", recipient)))?;
            builder = builder.to(mailbox);
        }

        builder
            .multipart(MultiPart::alternative_plain_html(
                mail.text_body.clone(),
                mail.html_body.clone(),
            ))
            .map_err(|e| {
                tracing::error!("Failed to build share email: {}", e);
                AppError::Dispatch(DISPATCH_FAILED.to_string())
            })
    }
}

#[async_trait]
impl MailRelay for SmtpRelay {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), AppError> {
        let message = self.build_message(mail)?;

        self.transport.send(message).await.map_err(|e| {
            tracing::error!("Mail relay rejected share email: {}", e);
            AppError::Dispatch(DISPATCH_FAILED.to_string())
        })?;

        tracing::info!("Share email accepted for {} recipients", mail.recipients.len());
        Ok(())
    }
}

/// Used when no sender account is configured; every dispatch fails.
pub struct UnconfiguredMailRelay;

#[async_trait]
impl MailRelay for UnconfiguredMailRelay {
    async fn send(&self, _mail: &OutgoingMail) -> Result<(), AppError> {
        tracing::error!("Share email attempted but no mail relay is configured");
        Err(AppError::Dispatch(DISPATCH_FAILED.to_string()))
    }
}
