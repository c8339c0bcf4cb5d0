use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{
    db::{
        dao::{AccessRequestDao, DaoBase, RegistrationTokenDao, UserDao},
        entities::{
            access_request::{self, AccessRequestStatus},
            user,
        },
    },
    error::AppError,
    services::{notifier::Notifier, token_service::TokenService},
};

/// The only transitions an admin may make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl From<ReviewDecision> for AccessRequestStatus {
    fn from(decision: ReviewDecision) -> Self {
        match decision {
            ReviewDecision::Approved => AccessRequestStatus::Approved,
            ReviewDecision::Rejected => AccessRequestStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reviewer {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccessRequestView {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub status: AccessRequestStatus,
    pub reviewed_at: Option<DateTime<FixedOffset>>,
    pub reviewer: Option<Reviewer>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl AccessRequestView {
    fn new(request: access_request::Model, reviewer: Option<Reviewer>) -> Self {
        Self {
            id: request.id,
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            status: request.status,
            reviewed_at: request.reviewed_at,
            reviewer,
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct AdminService {
    users: UserDao,
    access_requests: AccessRequestDao,
    registration_tokens: TokenService<RegistrationTokenDao>,
    notifier: Notifier,
}

impl AdminService {
    pub fn new(
        users: UserDao,
        access_requests: AccessRequestDao,
        registration_tokens: TokenService<RegistrationTokenDao>,
        notifier: Notifier,
    ) -> Self {
        Self {
            users,
            access_requests,
            registration_tokens,
            notifier,
        }
    }

    /// Pending first, then approved, then rejected; newest first within each.
    pub async fn list_access_requests(&self) -> Result<Vec<AccessRequestView>, AppError> {
        let requests = self.access_requests.list_all().await?;

        let mut reviewer_ids: Vec<Uuid> = requests.iter().filter_map(|r| r.reviewed_by).collect();
        reviewer_ids.sort_unstable();
        reviewer_ids.dedup();
        let reviewers: HashMap<Uuid, Reviewer> = self
            .users
            .find_by_ids(reviewer_ids)
            .await?
            .into_iter()
            .map(|user| {
                (
                    user.id,
                    Reviewer {
                        id: user.id,
                        username: user.username,
                    },
                )
            })
            .collect();

        let mut views: Vec<AccessRequestView> = requests
            .into_iter()
            .map(|request| {
                let reviewer = request
                    .reviewed_by
                    .and_then(|id| reviewers.get(&id).cloned());
                AccessRequestView::new(request, reviewer)
            })
            .collect();
        views.sort_by_key(|view| view.status.priority());
        Ok(views)
    }

    pub async fn list_users(&self) -> Result<Vec<user::Model>, AppError> {
        Ok(self.users.list_all().await?)
    }

    pub async fn review_access_request(
        &self,
        id: Uuid,
        decision: ReviewDecision,
        admin: &user::Model,
    ) -> Result<(), AppError> {
        let request = self
            .access_requests
            .try_find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Access request not found"))?;
        if request.status != AccessRequestStatus::Pending {
            return Err(AppError::access_request_not_pending());
        }

        let status = AccessRequestStatus::from(decision);
        let now = Utc::now().fixed_offset();
        if !self.access_requests.review(id, status, admin.id, now).await? {
            return Err(AppError::access_request_not_pending());
        }
        info!(access_request_id = %id, ?status, admin = %admin.username, "access request reviewed");

        match decision {
            ReviewDecision::Approved => {
                let token = self.registration_tokens.issue(id).await?;
                self.notifier.access_approved(&request, &token);
            }
            ReviewDecision::Rejected => self.notifier.access_rejected(&request),
        }
        Ok(())
    }
}
