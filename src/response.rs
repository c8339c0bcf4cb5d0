use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::{AppError, ErrorKind};

pub type ApiResult<T> = Result<JsonApiResponse<T>, AppError>;

const OK_CODE: &str = "OK";
const INTERNAL_MESSAGE: &str = "internal server error";

#[derive(Debug, Serialize)]
pub struct JsonApiResponse<T: Serialize> {
    pub status: u16,
    pub code: String,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> JsonApiResponse<T> {
    pub fn ok(data: T) -> ApiResult<T> {
        Self::with_status(StatusCode::OK, "ok", data)
    }

    pub fn with_status(status: StatusCode, message: impl Into<String>, data: T) -> ApiResult<T> {
        Ok(Self {
            status: status.as_u16(),
            code: OK_CODE.to_string(),
            message: message.into(),
            data,
        })
    }
}

impl JsonApiResponse<serde_json::Value> {
    pub(crate) fn from_error(err: &AppError) -> Self {
        let status = status_for(err);
        let message = if err.kind() == ErrorKind::Internal && !cfg!(debug_assertions) {
            INTERNAL_MESSAGE.to_string()
        } else {
            err.message().to_string()
        };

        Self {
            status: status.as_u16(),
            code: err.code().to_string(),
            message,
            data: serde_json::Value::Null,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if status.is_server_error() {
            log_app_error(&self, status);
        }
        JsonApiResponse::from_error(&self).into_response()
    }
}

impl<T: Serialize> IntoResponse for JsonApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

pub(crate) fn log_app_error(err: &AppError, status: StatusCode) {
    tracing::error!(
        status = status.as_u16(),
        code = err.code(),
        message = err.message(),
        "request failed"
    );
}

pub(crate) fn status_for(err: &AppError) -> StatusCode {
    match err.kind() {
        ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use axum::{body, http::StatusCode, response::IntoResponse};

    use crate::error::AppError;

    use super::JsonApiResponse;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should read");
        serde_json::from_slice(&bytes).expect("body should be json")
    }

    #[tokio::test]
    async fn error_envelope_carries_status_code_and_message() {
        let response = AppError::username_already_registered().into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let json = body_json(response).await;
        assert_eq!(json["status"], 409);
        assert_eq!(json["code"], "USERNAME_ALREADY_REGISTERED");
        assert_eq!(json["message"], "Username already registered");
        assert!(json["data"].is_null());
    }

    #[tokio::test]
    async fn success_envelope_uses_ok_code() {
        let response = JsonApiResponse::ok("ok")
            .expect("ok response")
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["code"], "OK");
        assert_eq!(json["data"], "ok");
    }

    #[tokio::test]
    async fn with_status_sets_http_status() {
        let response = JsonApiResponse::with_status(StatusCode::ACCEPTED, "accepted", 1)
            .expect("accepted response")
            .into_response();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }
}
