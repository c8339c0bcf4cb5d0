use std::sync::Arc;

use axum::{
    Router,
    extract::{
        DefaultBodyLimit, State,
        multipart::{Multipart, MultipartError},
    },
    http::StatusCode,
    routing::post,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::AppError,
    routes::{ApiResult, AuthGuard, CurrentUser, JsonApiResponse},
    services::{
        ServiceContext,
        feedback_service::{FeedbackInput, FeedbackUpload},
    },
    state::AppState,
};

/// Whole-request cap; single files are limited in the service.
pub const MAX_FEEDBACK_BODY_BYTES: usize = 32 * 1024 * 1024;

#[derive(Debug, Serialize)]
pub struct FeedbackAccepted {
    pub feedback_id: Uuid,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/feedback", post(submit_feedback))
        .layer(DefaultBodyLimit::max(MAX_FEEDBACK_BODY_BYTES))
        .with_state(state)
}

async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): AuthGuard,
    multipart: Multipart,
) -> ApiResult<FeedbackAccepted> {
    let input = read_form(multipart).await?;
    let services = ServiceContext::from_state(state.as_ref());
    let feedback = services.feedback().submit(input, Some(user.id)).await?;
    JsonApiResponse::with_status(
        StatusCode::ACCEPTED,
        "accepted",
        FeedbackAccepted {
            feedback_id: feedback.id,
        },
    )
}

async fn read_form(mut multipart: Multipart) -> Result<FeedbackInput, AppError> {
    let mut input = FeedbackInput::default();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "files" => {
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                input.files.push(FeedbackUpload {
                    original_name,
                    bytes: bytes.to_vec(),
                });
            }
            "type" => input.feedback_type = field.text().await.map_err(multipart_error)?,
            "url" => input.url = field.text().await.map_err(multipart_error)?,
            "title" => input.title = field.text().await.map_err(multipart_error)?,
            "description" => input.description = field.text().await.map_err(multipart_error)?,
            _ => {}
        }
    }
    Ok(input)
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::payload_too_large("Request body too large")
    } else {
        AppError::validation(format!("Invalid multipart body: {}", err.body_text()))
    }
}
