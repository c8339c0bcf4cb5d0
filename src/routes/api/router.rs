use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

use super::{admin, auth, feedback, health, muscle_groups, users};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health::router())
        .merge(auth::router(state.clone()))
        .merge(users::router(state.clone()))
        .merge(admin::router(state.clone()))
        .merge(feedback::router(state.clone()))
        .merge(muscle_groups::router(state))
}
