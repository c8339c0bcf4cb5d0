use std::sync::Arc;

use axum::{Router, extract::State, routing::get};

use crate::{
    routes::{ApiResult, AuthGuard, JsonApiResponse},
    services::{ServiceContext, muscle_group_service::MuscleGroupView},
    state::AppState,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/muscle-groups", get(list_muscle_groups))
        .with_state(state)
}

async fn list_muscle_groups(
    State(state): State<Arc<AppState>>,
    _user: AuthGuard,
) -> ApiResult<Vec<MuscleGroupView>> {
    let services = ServiceContext::from_state(state.as_ref());
    JsonApiResponse::ok(services.muscle_groups().list().await?)
}
