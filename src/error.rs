use crate::db::dao::DaoLayerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    PayloadTooLarge,
    Internal,
}

impl ErrorKind {
    fn default_code(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BAD_REQUEST",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }
}

/// Error returned by services and handlers. `kind` picks the HTTP status,
/// `code` is the stable identifier clients switch on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppError {
    kind: ErrorKind,
    code: &'static str,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: kind.default_code(),
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = code;
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PayloadTooLarge, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::bad_request(message).with_code("VALIDATION_ERROR")
    }

    pub fn invalid_credentials() -> Self {
        Self::unauthorized("Invalid credentials").with_code("INVALID_CREDENTIALS")
    }

    pub fn invalid_token() -> Self {
        Self::bad_request("Invalid or expired token").with_code("INVALID_TOKEN")
    }

    pub fn email_already_registered() -> Self {
        Self::conflict("Email already registered").with_code("EMAIL_ALREADY_REGISTERED")
    }

    pub fn username_already_registered() -> Self {
        Self::conflict("Username already registered").with_code("USERNAME_ALREADY_REGISTERED")
    }

    pub fn access_request_pending() -> Self {
        Self::conflict("Access request is pending review").with_code("ACCESS_REQUEST_PENDING")
    }

    pub fn access_request_rejected() -> Self {
        Self::forbidden("Access request was rejected").with_code("ACCESS_REQUEST_REJECTED")
    }

    pub fn access_request_not_pending() -> Self {
        Self::bad_request("Access request has already been reviewed")
            .with_code("ACCESS_REQUEST_STATUS_ERROR")
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

impl std::error::Error for AppError {}

impl From<DaoLayerError> for AppError {
    fn from(err: DaoLayerError) -> Self {
        match &err {
            DaoLayerError::NotFound { .. } => AppError::not_found(err.to_string()),
            DaoLayerError::InvalidPagination { .. } => AppError::bad_request(err.to_string()),
            DaoLayerError::Db(db_err) if is_unique_violation(db_err) => {
                AppError::conflict("Resource already exists")
            }
            DaoLayerError::Db(_) => AppError::internal(err.to_string()),
        }
    }
}

fn is_unique_violation(err: &sea_orm::DbErr) -> bool {
    matches!(
        err.sql_err(),
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
    )
}
