//! Authentication error types.

use thiserror::Error;

use tradewind_core::UserId;

use super::token::TokenError;
use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] tradewind_core::EmailError),

    /// Invalid credentials (unknown email or wrong password).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The token's subject no longer exists in the identity store.
    #[error("user with id {0} does not exist")]
    SubjectNotFound(UserId),

    /// A user with this email already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Session token error.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
