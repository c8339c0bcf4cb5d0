//! Outbound notifications: transactional email and issue filing.
//!
//! Backends are picked once at startup from config and shared as trait
//! objects. Callers run deliveries in background tasks, so errors here are
//! logged rather than returned to clients.

pub mod email;
pub mod github;
pub mod messages;

use std::sync::Arc;

use crate::config::{EmailConfig, GitHubConfig};

pub use email::{ConsoleSender, DisabledSender, EmailMessage, EmailSender, SmtpSender};
pub use github::{ConsoleTracker, GitHubApiTracker, IssueDraft, IssueTracker};

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("failed to render email template: {0}")]
    Template(#[from] askama::Error),
    #[error("invalid email address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },
    #[error("failed to build email: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("smtp delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("github request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("github rejected issue with status {status}: {body}")]
    GitHubStatus { status: u16, body: String },
}

pub fn email_sender(cfg: &EmailConfig) -> Result<Arc<dyn EmailSender>, NotifyError> {
    let sender: Arc<dyn EmailSender> = match cfg {
        EmailConfig::Smtp(smtp) => Arc::new(SmtpSender::from_config(smtp)?),
        EmailConfig::Console => Arc::new(ConsoleSender),
        EmailConfig::Disabled => Arc::new(DisabledSender),
    };
    Ok(sender)
}

pub fn issue_tracker(cfg: &GitHubConfig) -> Result<Arc<dyn IssueTracker>, NotifyError> {
    let tracker: Arc<dyn IssueTracker> = match cfg {
        GitHubConfig::Api(api) => Arc::new(GitHubApiTracker::from_config(api)?),
        GitHubConfig::Console => Arc::new(ConsoleTracker),
    };
    Ok(tracker)
}
