//! Authentication service.
//!
//! Password signup/login plus account management. Session tokens live in
//! the [`token`] submodule; password hashing is delegated to argon2.

mod error;
pub mod token;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use tradewind_core::{Email, UserId, UserRole};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
///
/// Handles signup, login, account updates, and re-resolution of token
/// subjects against the user table.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;

        if self.users.get_by_email(&email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists);
        }

        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(name, &email, &password_hash, role)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is unknown or the
    /// password is wrong; the two cases are deliberately indistinguishable.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Re-resolve a token subject against the identity store.
    ///
    /// A verified token only proves the signature and expiry; the subject
    /// may have been deleted since issue.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SubjectNotFound` if the user no longer exists.
    pub async fn resolve_subject(&self, user_id: UserId) -> Result<User, AuthError> {
        self.users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::SubjectNotFound(user_id))
    }

    /// Overwrite the current user's profile.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserAlreadyExists` if the new email belongs to a
    /// different user, plus the same validation errors as signup.
    pub async fn update_profile(
        &self,
        current: &User,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;

        if let Some(existing) = self.users.get_by_email(&email).await?
            && existing.id != current.id
        {
            return Err(AuthError::UserAlreadyExists);
        }

        let password_hash = hash_password(password)?;

        let user = self
            .users
            .update(current.id, name, &email, &password_hash, role)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                RepositoryError::NotFound => AuthError::SubjectNotFound(current.id),
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Delete a user account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SubjectNotFound` if the user doesn't exist.
    pub async fn delete_account(&self, user_id: UserId) -> Result<(), AuthError> {
        if !self.users.delete(user_id).await? {
            return Err(AuthError::SubjectNotFound(user_id));
        }
        Ok(())
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_too_short() {
        let err = validate_password("short").unwrap_err();
        assert!(matches!(err, AuthError::WeakPassword(_)));
    }

    #[test]
    fn test_validate_password_ok() {
        assert!(validate_password("long enough password").is_ok());
    }

    #[test]
    fn test_hash_then_verify_round_trip() {
        let hash = hash_password("correct horse battery").unwrap();

        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password", &hash).unwrap_err(),
            AuthError::InvalidCredentials
        ));
    }

    #[test]
    fn test_verify_against_garbage_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string").unwrap_err(),
            AuthError::InvalidCredentials
        ));
    }
}
