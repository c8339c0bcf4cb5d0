//! The emails the server sends, rendered from `templates/email`.

use askama::Template;

use super::{EmailMessage, NotifyError};

#[derive(Template)]
#[template(path = "email/access_request.txt")]
struct AccessRequestTemplate<'a> {
    first_name: &'a str,
    last_name: &'a str,
    request_id: &'a str,
}

#[derive(Template)]
#[template(path = "email/approved.txt")]
struct ApprovedTemplate<'a> {
    first_name: &'a str,
    project_name: &'a str,
    register_url: &'a str,
}

#[derive(Template)]
#[template(path = "email/rejected.txt")]
struct RejectedTemplate<'a> {
    first_name: &'a str,
    project_name: &'a str,
}

#[derive(Template)]
#[template(path = "email/password_reset.txt")]
struct PasswordResetTemplate<'a> {
    first_name: &'a str,
    project_name: &'a str,
    reset_url: &'a str,
}

/// Builds links into the web client and renders message bodies.
#[derive(Debug, Clone)]
pub struct Messages {
    client_url: String,
    project_name: &'static str,
}

impl Messages {
    pub fn new(client_url: &str, project_name: &'static str) -> Self {
        Self {
            client_url: client_url.trim_end_matches('/').to_string(),
            project_name,
        }
    }

    pub fn register_url(&self, token: &str) -> String {
        format!("{}/register?token={token}", self.client_url)
    }

    pub fn reset_url(&self, token: &str) -> String {
        format!("{}/reset-password?token={token}", self.client_url)
    }

    pub fn access_request_notice(
        &self,
        admin_email: &str,
        requester_email: &str,
        first_name: &str,
        last_name: &str,
        request_id: &str,
    ) -> Result<EmailMessage, NotifyError> {
        let body = AccessRequestTemplate {
            first_name,
            last_name,
            request_id,
        }
        .render()?;
        Ok(EmailMessage {
            to: admin_email.to_string(),
            subject: format!("New access request: {requester_email}"),
            body,
        })
    }

    pub fn access_approved(
        &self,
        to: &str,
        first_name: &str,
        token: &str,
    ) -> Result<EmailMessage, NotifyError> {
        let register_url = self.register_url(token);
        let body = ApprovedTemplate {
            first_name,
            project_name: self.project_name,
            register_url: &register_url,
        }
        .render()?;
        Ok(EmailMessage {
            to: to.to_string(),
            subject: "Access Request Approved".to_string(),
            body,
        })
    }

    pub fn access_rejected(&self, to: &str, first_name: &str) -> Result<EmailMessage, NotifyError> {
        let body = RejectedTemplate {
            first_name,
            project_name: self.project_name,
        }
        .render()?;
        Ok(EmailMessage {
            to: to.to_string(),
            subject: "Access Request Update".to_string(),
            body,
        })
    }

    pub fn password_reset(
        &self,
        to: &str,
        first_name: &str,
        token: &str,
    ) -> Result<EmailMessage, NotifyError> {
        let reset_url = self.reset_url(token);
        let body = PasswordResetTemplate {
            first_name,
            project_name: self.project_name,
            reset_url: &reset_url,
        }
        .render()?;
        Ok(EmailMessage {
            to: to.to_string(),
            subject: "Password Reset Request".to_string(),
            body,
        })
    }
}
