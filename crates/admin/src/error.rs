//! Unified error handling for the admin backend.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::sms::SmsError;
use crate::services::storage::StorageError;

/// Application-level error type for the admin backend.
///
/// Every handler returns `Result<_, AppError>`; the `IntoResponse` impl owns
/// the HTTP status mapping so the per-module status-code drift of older
/// revisions cannot come back.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),

    /// Token or credential handling failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// SMS issue/verify failed.
    #[error("sms error: {0}")]
    Sms(#[from] SmsError),

    /// Upload storage failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Bad request from the client.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Caller is not authenticated.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The authorization gate denied the request.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A precondition on existing rows did not hold.
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    /// The submitted value repeats state it must differ from.
    #[error("expectation failed: {0}")]
    ExpectationFailed(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(e) => match e {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Auth(_) | Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Sms(e) => e.status(),
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PermissionDenied(_) => StatusCode::FAILED_DEPENDENCY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::PreconditionFailed(_) => StatusCode::PRECONDITION_FAILED,
            Self::ExpectationFailed(_) => StatusCode::EXPECTATION_FAILED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_) | Self::Storage(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(RepositoryError::NotFound) => "not found".to_owned(),
            Self::Database(RepositoryError::Conflict(msg)) => msg.clone(),
            Self::Database(_) | Self::Internal(_) | Self::Storage(_) => {
                "internal server error".to_owned()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("order 10000".to_owned());
        assert_eq!(err.to_string(), "not found: order 10000");

        let err = AppError::BadRequest("invalid input".to_owned());
        assert_eq!(err.to_string(), "bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            status_of(AppError::BadRequest("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Unauthorized("x".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::PermissionDenied("x".into())),
            StatusCode::FAILED_DEPENDENCY
        );
        assert_eq!(
            status_of(AppError::NotFound("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Conflict("x".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::PreconditionFailed("x".into())),
            StatusCode::PRECONDITION_FAILED
        );
        assert_eq!(
            status_of(AppError::ExpectationFailed("x".into())),
            StatusCode::EXPECTATION_FAILED
        );
        assert_eq!(
            status_of(AppError::Internal("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_repository_error_mapping() {
        assert_eq!(
            status_of(AppError::Database(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Database(RepositoryError::Conflict(
                "name already exists".into()
            ))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::Database(RepositoryError::DataCorruption(
                "bad row".into()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
