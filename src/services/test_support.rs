//! Fixtures shared by the service tests.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};

use chrono::{FixedOffset, TimeZone};
use sea_orm::{DatabaseConnection, MockExecResult};
use uuid::Uuid;

use crate::{
    auth::jwt::JwtKeys,
    db::entities::{access_request, user},
    notify::{EmailMessage, EmailSender, IssueDraft, IssueTracker, NotifyError, messages::Messages},
    services::{ServiceContext, notifier::Notifier},
};

pub fn ts() -> chrono::DateTime<chrono::FixedOffset> {
    FixedOffset::east_opt(0)
        .expect("offset should be valid")
        .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
        .single()
        .expect("timestamp should be valid")
}

pub fn exec(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

pub fn user_model(username: &str, is_admin: bool) -> user::Model {
    user::Model {
        id: Uuid::new_v4(),
        created_at: ts(),
        updated_at: ts(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        password_hash: "hash".to_string(),
        is_admin,
    }
}

pub fn access_request_model(status: access_request::AccessRequestStatus) -> access_request::Model {
    access_request::Model {
        id: Uuid::new_v4(),
        created_at: ts(),
        updated_at: ts(),
        email: "new@example.com".to_string(),
        first_name: "New".to_string(),
        last_name: "Person".to_string(),
        status,
        reviewed_at: None,
        reviewed_by: None,
    }
}

async fn wait_until<T>(mut poll: impl FnMut() -> Option<T>) -> T {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if let Some(value) = poll() {
                return value;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("background delivery should finish")
}

#[derive(Clone, Default)]
pub struct RecordingSender {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
}

impl RecordingSender {
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().expect("lock").clone()
    }

    pub async fn wait_for(&self, count: usize) -> Vec<EmailMessage> {
        wait_until(|| Some(self.sent()).filter(|sent| sent.len() >= count)).await
    }
}

#[async_trait::async_trait]
impl EmailSender for RecordingSender {
    fn backend(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, message: EmailMessage) -> Result<(), NotifyError> {
        self.sent.lock().expect("lock").push(message);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct RecordingTracker {
    filed: Arc<Mutex<Vec<(Uuid, IssueDraft)>>>,
}

impl RecordingTracker {
    pub async fn wait_for(&self, count: usize) -> Vec<(Uuid, IssueDraft)> {
        wait_until(|| {
            let filed = self.filed.lock().expect("lock").clone();
            Some(filed).filter(|filed| filed.len() >= count)
        })
        .await
    }
}

#[async_trait::async_trait]
impl IssueTracker for RecordingTracker {
    fn backend(&self) -> &'static str {
        "recording"
    }

    async fn file_issue(
        &self,
        feedback_id: Uuid,
        issue: IssueDraft,
    ) -> Result<Option<String>, NotifyError> {
        self.filed.lock().expect("lock").push((feedback_id, issue));
        Ok(None)
    }
}

pub struct TestServices {
    pub context: ServiceContext,
    pub jwt: JwtKeys,
    pub emails: RecordingSender,
    pub issues: RecordingTracker,
    pub feedback_dir: PathBuf,
}

impl TestServices {
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_feedback_dir(db, std::env::temp_dir().join("reptrack-tests"))
    }

    pub fn with_feedback_dir(db: DatabaseConnection, feedback_dir: PathBuf) -> Self {
        let jwt = JwtKeys::from_secret(b"service-test-secret");
        let emails = RecordingSender::default();
        let issues = RecordingTracker::default();
        let notifier = Notifier::new(
            Arc::new(emails.clone()),
            Arc::new(issues.clone()),
            Messages::new("http://localhost:5173", "RepTrack-Test"),
        );
        Self {
            context: ServiceContext::new(&db, jwt.clone(), notifier, feedback_dir.clone()),
            jwt,
            emails,
            issues,
            feedback_dir,
        }
    }
}
