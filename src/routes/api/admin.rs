use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::AppError,
    routes::{AdminRole, ApiResult, AuthRoleGuard, JsonApiResponse, api::users::UserView},
    services::{
        ServiceContext,
        admin_service::{AccessRequestView, ReviewDecision},
    },
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub status: ReviewDecision,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/admin/access-requests", get(list_access_requests))
        .route("/admin/access-requests/{id}", patch(review_access_request))
        .route("/admin/users", get(list_users))
        .with_state(state)
}

async fn list_access_requests(
    State(state): State<Arc<AppState>>,
    _admin: AuthRoleGuard<AdminRole>,
) -> ApiResult<Vec<AccessRequestView>> {
    let services = ServiceContext::from_state(state.as_ref());
    JsonApiResponse::ok(services.admin().list_access_requests().await?)
}

async fn review_access_request(
    State(state): State<Arc<AppState>>,
    AuthRoleGuard { user: admin, .. }: AuthRoleGuard<AdminRole>,
    Path(id): Path<Uuid>,
    Json(body): Json<ReviewRequest>,
) -> Result<StatusCode, AppError> {
    let services = ServiceContext::from_state(state.as_ref());
    services
        .admin()
        .review_access_request(id, body.status, &admin)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_users(
    State(state): State<Arc<AppState>>,
    _admin: AuthRoleGuard<AdminRole>,
) -> ApiResult<Vec<UserView>> {
    let services = ServiceContext::from_state(state.as_ref());
    let users = services.admin().list_users().await?;
    JsonApiResponse::ok(users.into_iter().map(UserView::from).collect())
}
