use std::sync::Arc;

use axum::{Router, routing::get};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::entities::user,
    routes::{ApiResult, AuthGuard, CurrentUser, JsonApiResponse},
    state::AppState,
};

/// Public shape of an account; the password hash never leaves the server.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
    pub created_at: DateTime<FixedOffset>,
}

impl From<user::Model> for UserView {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/users/current", get(current_user))
        .with_state(state)
}

async fn current_user(CurrentUser(user): AuthGuard) -> ApiResult<UserView> {
    JsonApiResponse::ok(user.into())
}
