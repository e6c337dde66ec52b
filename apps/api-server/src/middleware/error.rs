//! Error taxonomy and its JSON rendering.

use actix_web::{
    HttpRequest, HttpResponse, ResponseError, error::BlockingError, error::JsonPayloadError,
    http::StatusCode,
};
use board_core::error::{DomainError, RepoError};
use board_core::ports::AuthError;
use board_shared::ErrorResponse;

/// Application-level error type rendered as `{message, status}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("User already exists")]
    Conflict,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Access token required")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Route not found")]
    NotFound,

    /// Detail is logged, never sent.
    #[error("Internal server error")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::MissingToken => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(detail) = self {
            tracing::error!("Internal error: {}", detail);
        }

        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse::new(status.as_u16(), self.to_string()))
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Duplicate(_) => AppError::Conflict,
            other => AppError::Validation(other.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Unique(_) => AppError::Conflict,
            RepoError::NotFound => AppError::NotFound,
            RepoError::Connection(msg) => {
                AppError::Internal(format!("Database connection error: {msg}"))
            }
            RepoError::Query(msg) => AppError::Internal(format!("Database query error: {msg}")),
            RepoError::ForeignKey(msg) => AppError::Internal(format!("Foreign key violation: {msg}")),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::InvalidCredentials,
            AuthError::MissingToken => AppError::MissingToken,
            AuthError::TokenExpired | AuthError::InvalidToken(_) => AppError::InvalidToken,
            AuthError::HashingError(msg) => AppError::Internal(format!("Password hashing: {msg}")),
            AuthError::SigningError(msg) => AppError::Internal(format!("Token signing: {msg}")),
        }
    }
}

impl From<BlockingError> for AppError {
    fn from(err: BlockingError) -> Self {
        AppError::Internal(format!("Blocking task failed: {err}"))
    }
}

/// Turns body decoding failures into a 400 with the JSON error shape.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(path = %req.path(), "Rejected request body: {}", err);

    let message = match err {
        JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            "Request body too large".to_string()
        }
        _ => "Malformed JSON body".to_string(),
    };

    AppError::Validation(message).into()
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
