use std::sync::Arc;

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::{
    auth::cookies::REFRESH_COOKIE,
    error::AppError,
    routes::{ApiResult, JsonApiResponse},
    services::{
        ServiceContext,
        auth_service::{AccessRequestInput, AccessRequestOutcome},
    },
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct AccessRequestBody {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub token: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/auth/request-access", post(request_access))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password", post(reset_password))
        .with_state(state)
}

async fn request_access(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AccessRequestBody>,
) -> ApiResult<AccessRequestOutcome> {
    let services = ServiceContext::from_state(state.as_ref());
    let outcome = services
        .auth()
        .request_access(AccessRequestInput {
            email: body.email,
            first_name: body.first_name,
            last_name: body.last_name,
        })
        .await?;
    JsonApiResponse::ok(outcome)
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Result<StatusCode, AppError> {
    let services = ServiceContext::from_state(state.as_ref());
    services
        .auth()
        .register(&body.token, &body.username, &body.password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, StatusCode), AppError> {
    let services = ServiceContext::from_state(state.as_ref());
    let tokens = services.auth().login(&body.username, &body.password).await?;
    let jar = state.cookies().with_session(jar, tokens, &state.jwt);
    Ok((jar, StatusCode::NO_CONTENT))
}

async fn refresh(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), AppError> {
    let refresh_token = jar
        .get(REFRESH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(AppError::invalid_credentials)?;

    let services = ServiceContext::from_state(state.as_ref());
    let access_token = services.auth().refresh(&refresh_token).await?;
    let jar = state.cookies().with_access(jar, access_token, &state.jwt);
    Ok((jar, StatusCode::NO_CONTENT))
}

async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, StatusCode) {
    (state.cookies().cleared(jar), StatusCode::NO_CONTENT)
}

async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<StatusCode, AppError> {
    let services = ServiceContext::from_state(state.as_ref());
    services.auth().forgot_password(&body.email).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<StatusCode, AppError> {
    let services = ServiceContext::from_state(state.as_ref());
    services
        .auth()
        .reset_password(&body.token, &body.password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
