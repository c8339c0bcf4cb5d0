//! Fire-and-forget delivery of emails and feedback issues.
//!
//! Every send runs on its own tokio task; failures are logged with `warn!`
//! and never reach the request that triggered them.

use std::sync::Arc;

use tracing::warn;

use crate::{
    db::entities::{access_request, feedback, user},
    notify::{EmailMessage, EmailSender, IssueDraft, IssueTracker, NotifyError, messages::Messages},
};

#[derive(Clone)]
pub struct Notifier {
    email: Arc<dyn EmailSender>,
    issues: Arc<dyn IssueTracker>,
    messages: Messages,
}

impl Notifier {
    pub fn new(
        email: Arc<dyn EmailSender>,
        issues: Arc<dyn IssueTracker>,
        messages: Messages,
    ) -> Self {
        Self {
            email,
            issues,
            messages,
        }
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn access_requested(&self, admins: &[user::Model], request: &access_request::Model) {
        let request_id = request.id.to_string();
        for admin in admins {
            self.spawn_email(self.messages.access_request_notice(
                &admin.email,
                &request.email,
                &request.first_name,
                &request.last_name,
                &request_id,
            ));
        }
    }

    pub fn access_approved(&self, request: &access_request::Model, token: &str) {
        self.spawn_email(
            self.messages
                .access_approved(&request.email, &request.first_name, token),
        );
    }

    pub fn access_rejected(&self, request: &access_request::Model) {
        self.spawn_email(
            self.messages
                .access_rejected(&request.email, &request.first_name),
        );
    }

    pub fn password_reset(&self, user: &user::Model, token: &str) {
        self.spawn_email(
            self.messages
                .password_reset(&user.email, &user.first_name, token),
        );
    }

    pub fn feedback_received(&self, feedback: &feedback::Model) {
        let tracker = Arc::clone(&self.issues);
        let feedback_id = feedback.id;
        let issue = IssueDraft::from_feedback(feedback);
        tokio::spawn(async move {
            if let Err(err) = tracker.file_issue(feedback_id, issue).await {
                warn!(%feedback_id, backend = tracker.backend(), "failed to file feedback issue: {err}");
            }
        });
    }

    fn spawn_email(&self, message: Result<EmailMessage, NotifyError>) {
        let message = match message {
            Ok(message) => message,
            Err(err) => {
                warn!("failed to build email: {err}");
                return;
            }
        };
        let sender = Arc::clone(&self.email);
        tokio::spawn(async move {
            let to = message.to.clone();
            if let Err(err) = sender.send(message).await {
                warn!(%to, backend = sender.backend(), "failed to send email: {err}");
            }
        });
    }
}
