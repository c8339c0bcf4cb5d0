use std::{fmt::Write as _, time::Duration};

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::NotifyError;
use crate::{config::GitHubApiConfig, db::entities::feedback};

const GITHUB_API_URL: &str = "https://api.github.com";
const USER_AGENT: &str = "reptrack-server";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDraft {
    pub title: String,
    pub body: String,
}

impl IssueDraft {
    pub fn from_feedback(feedback: &feedback::Model) -> Self {
        let title = format!(
            "[{}] {}",
            feedback.feedback_type.issue_label(),
            feedback.title
        );
        let user_id = feedback
            .user_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "None".to_string());

        let mut body = format!(
            "### Details\n\
             **Timestamp:** {}\n\
             **ID:** {}\n\
             **User ID:** {}\n\
             **URL:** {}\n\
             \n\
             ### Description\n\
             {}",
            feedback.created_at.format("%Y-%m-%dT%H:%M:%SZ"),
            feedback.id,
            user_id,
            feedback.url,
            feedback.description,
        );
        if !feedback.files.0.is_empty() {
            body.push_str("\n\n### Attachments");
            for file in &feedback.files.0 {
                let _ = write!(body, "\n- {} (`{}`)", file.original_name, file.path);
            }
        }

        Self { title, body }
    }
}

#[async_trait::async_trait]
pub trait IssueTracker: Send + Sync {
    fn backend(&self) -> &'static str;

    /// Returns the issue URL when the backend creates a real issue.
    async fn file_issue(
        &self,
        feedback_id: Uuid,
        issue: IssueDraft,
    ) -> Result<Option<String>, NotifyError>;
}

#[derive(Serialize)]
struct CreateIssue<'a> {
    title: &'a str,
    body: &'a str,
    assignees: [&'a str; 1],
}

#[derive(Deserialize)]
struct CreatedIssue {
    html_url: String,
}

#[derive(Clone)]
pub struct GitHubApiTracker {
    http: reqwest::Client,
    base_url: String,
    token: String,
    owner: String,
    repo: String,
}

impl GitHubApiTracker {
    pub fn from_config(cfg: &GitHubApiConfig) -> Result<Self, NotifyError> {
        Self::with_base_url(cfg, GITHUB_API_URL)
    }

    pub fn with_base_url(cfg: &GitHubApiConfig, base_url: &str) -> Result<Self, NotifyError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: cfg.token.clone(),
            owner: cfg.repo_owner.clone(),
            repo: cfg.repo_name.clone(),
        })
    }

    fn issues_url(&self) -> String {
        format!("{}/repos/{}/{}/issues", self.base_url, self.owner, self.repo)
    }
}

#[async_trait::async_trait]
impl IssueTracker for GitHubApiTracker {
    fn backend(&self) -> &'static str {
        "api"
    }

    async fn file_issue(
        &self,
        feedback_id: Uuid,
        issue: IssueDraft,
    ) -> Result<Option<String>, NotifyError> {
        let response = self
            .http
            .post(self.issues_url())
            .bearer_auth(&self.token)
            .json(&CreateIssue {
                title: &issue.title,
                body: &issue.body,
                assignees: [self.owner.as_str()],
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::GitHubStatus {
                status: status.as_u16(),
                body,
            });
        }

        let created: CreatedIssue = response.json().await?;
        info!(%feedback_id, url = %created.html_url, "filed github issue");
        Ok(Some(created.html_url))
    }
}

/// Logs the issue that would have been filed.
pub struct ConsoleTracker;

#[async_trait::async_trait]
impl IssueTracker for ConsoleTracker {
    fn backend(&self) -> &'static str {
        "console"
    }

    async fn file_issue(
        &self,
        feedback_id: Uuid,
        issue: IssueDraft,
    ) -> Result<Option<String>, NotifyError> {
        info!(%feedback_id, title = %issue.title, "console issue\n{}", issue.body);
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use uuid::Uuid;

    use crate::{
        config::GitHubApiConfig,
        db::entities::feedback::{self, FeedbackType, StoredFile, StoredFiles},
    };

    use super::{ConsoleTracker, GitHubApiTracker, IssueDraft, IssueTracker};

    fn feedback_model(files: Vec<StoredFile>) -> feedback::Model {
        feedback::Model {
            id: Uuid::parse_str("6f1c2a4e-0000-4000-8000-000000000001").expect("uuid"),
            created_at: FixedOffset::east_opt(0)
                .expect("offset")
                .with_ymd_and_hms(2026, 2, 3, 4, 5, 6)
                .single()
                .expect("timestamp"),
            user_id: None,
            feedback_type: FeedbackType::Feedback,
            url: "http://localhost:5173/history".to_string(),
            title: "Chart is empty".to_string(),
            description: "The volume chart shows nothing.".to_string(),
            files: StoredFiles(files),
        }
    }

    #[test]
    fn issue_body_lists_details_and_description() {
        let issue = IssueDraft::from_feedback(&feedback_model(Vec::new()));

        assert_eq!(issue.title, "[Feedback] Chart is empty");
        assert_eq!(
            issue.body,
            "### Details\n\
             **Timestamp:** 2026-02-03T04:05:06Z\n\
             **ID:** 6f1c2a4e-0000-4000-8000-000000000001\n\
             **User ID:** None\n\
             **URL:** http://localhost:5173/history\n\
             \n\
             ### Description\n\
             The volume chart shows nothing."
        );
    }

    #[test]
    fn feature_requests_and_attachments_are_labelled() {
        let mut model = feedback_model(vec![StoredFile {
            original_name: "chart.png".to_string(),
            path: "data/feedback/abc.png".to_string(),
        }]);
        model.feedback_type = FeedbackType::Feature;
        let user_id = Uuid::new_v4();
        model.user_id = Some(user_id);

        let issue = IssueDraft::from_feedback(&model);

        assert_eq!(issue.title, "[Feature Request] Chart is empty");
        assert!(issue.body.contains(&format!("**User ID:** {user_id}")));
        assert!(issue.body.ends_with(
            "The volume chart shows nothing.\n\n### Attachments\n- chart.png (`data/feedback/abc.png`)"
        ));
    }

    #[test]
    fn api_tracker_targets_repository_issues() {
        let tracker = GitHubApiTracker::from_config(&GitHubApiConfig {
            token: "ghp_test".to_string(),
            repo_owner: "octo".to_string(),
            repo_name: "reptrack".to_string(),
        })
        .expect("client should build");

        assert_eq!(
            tracker.issues_url(),
            "https://api.github.com/repos/octo/reptrack/issues"
        );
    }

    #[tokio::test]
    async fn console_tracker_files_nothing() {
        let url = ConsoleTracker
            .file_issue(
                Uuid::new_v4(),
                IssueDraft {
                    title: "t".to_string(),
                    body: "b".to_string(),
                },
            )
            .await
            .expect("console tracker should not fail");
        assert!(url.is_none());
    }
}
