use std::time::Duration;

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use tracing::{debug, info};

use super::NotifyError;
use crate::config::SmtpConfig;

const SMTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait::async_trait]
pub trait EmailSender: Send + Sync {
    fn backend(&self) -> &'static str;

    async fn send(&self, message: EmailMessage) -> Result<(), NotifyError>;
}

pub struct SmtpSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpSender {
    /// `smtp_use_ssl` wins over `smtp_use_tls`; with neither the session is
    /// plaintext.
    pub fn from_config(cfg: &SmtpConfig) -> Result<Self, NotifyError> {
        let builder = if cfg.smtp_use_ssl {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.smtp_host)?
        } else if cfg.smtp_use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&cfg.smtp_host)
        };
        let builder = builder.port(cfg.smtp_port).timeout(Some(SMTP_TIMEOUT));
        let builder = match (&cfg.smtp_username, &cfg.smtp_password) {
            (Some(username), Some(password)) => {
                builder.credentials(Credentials::new(username.clone(), password.clone()))
            }
            _ => builder,
        };

        Ok(Self {
            transport: builder.build(),
            from: parse_mailbox(&cfg.email_from)?,
        })
    }

    fn build(&self, message: EmailMessage) -> Result<Message, NotifyError> {
        Ok(Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(&message.to)?)
            .subject(message.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(message.body)?)
    }
}

#[async_trait::async_trait]
impl EmailSender for SmtpSender {
    fn backend(&self) -> &'static str {
        "smtp"
    }

    async fn send(&self, message: EmailMessage) -> Result<(), NotifyError> {
        let to = message.to.clone();
        let email = self.build(message)?;
        self.transport.send(email).await?;
        info!(%to, "email sent");
        Ok(())
    }
}

/// Prints messages to the log instead of delivering them.
pub struct ConsoleSender;

#[async_trait::async_trait]
impl EmailSender for ConsoleSender {
    fn backend(&self) -> &'static str {
        "console"
    }

    async fn send(&self, message: EmailMessage) -> Result<(), NotifyError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            "console email\n{}",
            message.body
        );
        Ok(())
    }
}

pub struct DisabledSender;

#[async_trait::async_trait]
impl EmailSender for DisabledSender {
    fn backend(&self) -> &'static str {
        "disabled"
    }

    async fn send(&self, message: EmailMessage) -> Result<(), NotifyError> {
        debug!(to = %message.to, subject = %message.subject, "email disabled, dropping message");
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address
        .parse::<Mailbox>()
        .map_err(|source| NotifyError::Address {
            address: address.to_string(),
            source,
        })
}
