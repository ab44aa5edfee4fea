//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`; every failure path maps to a stable status code
//! and a JSON `{"error": ...}` body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::auth::token::TokenError;
use crate::services::orders::OrderError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication operation failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Order operation failed.
    #[error("order error: {0}")]
    Order(#[from] OrderError),

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Role check failed.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON body returned for every error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    /// The status code this error maps to.
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_) | AuthError::WeakPassword(_) => {
                    StatusCode::BAD_REQUEST
                }
                // The original service reports credential failures as 403.
                AuthError::InvalidCredentials => StatusCode::FORBIDDEN,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::SubjectNotFound(_) => StatusCode::NOT_FOUND,
                AuthError::Token(TokenError::Expired | TokenError::Invalid) => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::Token(TokenError::Signing(_))
                | AuthError::Repository(_)
                | AuthError::PasswordHash => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Order(err) => match err {
                OrderError::InvalidReference(_) | OrderError::InvalidTotal { .. } => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                OrderError::NotFound(_) => StatusCode::NOT_FOUND,
                OrderError::Forbidden => StatusCode::FORBIDDEN,
                OrderError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Database(err) => match err {
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message exposed to the client.
    ///
    /// Internal causes are logged and captured but never leak into the
    /// response body.
    fn client_message(&self) -> String {
        if self.status_code().is_server_error() {
            return "internal server error".to_string();
        }

        match self {
            Self::Auth(err) => err.to_string(),
            Self::Order(err) => err.to_string(),
            Self::Database(err) => err.to_string(),
            Self::NotFound(msg) | Self::Forbidden(msg) | Self::BadRequest(msg) => msg.clone(),
            // Unreachable: Internal is always a server error.
            Self::Internal(_) => "internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = ErrorBody {
            error: self.client_message(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use tradewind_core::{OrderId, ProductId, UserId};

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.status_code()
    }

    #[test]
    fn test_validation_errors_map_to_422() {
        assert_eq!(
            get_status(OrderError::InvalidReference(ProductId::new(99)).into()),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(
                OrderError::InvalidTotal {
                    submitted: Decimal::from(10),
                    computed: Decimal::from(13),
                }
                .into()
            ),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_token_errors_map_to_401_with_distinct_messages() {
        let expired: AppError = AuthError::Token(TokenError::Expired).into();
        let invalid: AppError = AuthError::Token(TokenError::Invalid).into();

        assert_eq!(get_status(AuthError::Token(TokenError::Expired).into()), StatusCode::UNAUTHORIZED);
        assert_eq!(get_status(AuthError::Token(TokenError::Invalid).into()), StatusCode::UNAUTHORIZED);
        assert_ne!(expired.client_message(), invalid.client_message());
    }

    #[test]
    fn test_subject_not_found_maps_to_404() {
        assert_eq!(
            get_status(AuthError::SubjectNotFound(UserId::new(7)).into()),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_role_and_credential_failures_map_to_403() {
        assert_eq!(get_status(OrderError::Forbidden.into()), StatusCode::FORBIDDEN);
        assert_eq!(
            get_status(AuthError::InvalidCredentials.into()),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_conflict_maps_to_409() {
        assert_eq!(
            get_status(AuthError::UserAlreadyExists.into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(RepositoryError::Conflict("email".to_string()).into()),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_not_found_maps_to_404() {
        assert_eq!(
            get_status(OrderError::NotFound(OrderId::new(1)).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_internal_errors_are_redacted() {
        let err = AppError::Internal("connection string with password".to_string());
        assert_eq!(get_status(AppError::Internal(String::new())), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_message(), "internal server error");
    }
}
