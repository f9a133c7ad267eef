//! Admin Error Types
//!
//! Admin-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. Authorization and token errors
//! come in through `auth::AuthError` and keep their mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use auth::error::AuthError;

/// Admin-specific result type alias
pub type AdminResult<T> = Result<T, AdminError>;

/// Admin-specific error variants
#[derive(Debug, Error)]
pub enum AdminError {
    /// Target user does not exist
    #[error("User not found")]
    UserNotFound,

    /// Target activity log entry does not exist
    #[error("Activity log not found")]
    LogNotFound,

    /// Operation an administrator may not perform on their own account
    #[error("{0}")]
    SelfAction(&'static str),

    /// Request payload validation error
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Authentication / authorization error from the auth layer
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AdminError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AdminError::UserNotFound | AdminError::LogNotFound => StatusCode::NOT_FOUND,
            AdminError::SelfAction(_) | AdminError::Validation(_) => StatusCode::BAD_REQUEST,
            AdminError::Auth(e) => e.status_code(),
            AdminError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdminError::UserNotFound | AdminError::LogNotFound => ErrorKind::NotFound,
            AdminError::SelfAction(_) | AdminError::Validation(_) => ErrorKind::BadRequest,
            AdminError::Auth(e) => e.kind(),
            AdminError::Database(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AdminError::Database(e) => {
                tracing::error!(error = %e, "Admin database error");
            }
            AdminError::SelfAction(msg) => {
                tracing::warn!(message = %msg, "Blocked self-targeted admin action");
            }
            _ => {
                tracing::debug!(error = %self, "Admin error");
            }
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        // Auth errors carry their own logging rules
        if let AdminError::Auth(e) = self {
            return e.into_response();
        }
        self.log();
        self.to_app_error().into_response()
    }
}
