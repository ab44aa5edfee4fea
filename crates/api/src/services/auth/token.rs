//! Stateless session tokens.
//!
//! Tokens are HMAC-signed claims `{user_id, user_role, exp}` with a
//! configured lifetime. Validity is purely a function of the signature and
//! the embedded expiry: there is no revocation mechanism, and issuing a new
//! token does not invalidate previously issued ones before they expire.
//! Verification is a pure computation and never touches the store; callers
//! re-resolve the subject against the user table afterwards.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tradewind_core::{UserId, UserRole};

use crate::config::AuthConfig;

/// Errors that can occur when issuing or verifying a session token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token's signature is valid but its expiry has passed.
    ///
    /// Reported separately from [`TokenError::Invalid`] so clients can
    /// distinguish "log in again" from "this token was never good".
    #[error("token has expired")]
    Expired,

    /// Bad signature, malformed token, or missing claims.
    #[error("could not validate credentials")]
    Invalid,

    /// Signing failed (e.g. misconfigured key material).
    #[error("token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Identity claims embedded in every session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the authenticated user's ID.
    pub user_id: UserId,
    /// The subject's role at issue time.
    pub user_role: UserRole,
    /// Expiry as a UTC unix timestamp.
    pub exp: i64,
}

/// Issues and verifies session tokens.
///
/// Constructed once from [`AuthConfig`] at startup and shared through the
/// application state.
pub struct TokenService {
    header: Header,
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_minutes: i64,
}

impl TokenService {
    /// Create a token service from the loaded configuration.
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.expose_secret().as_bytes();

        let mut validation = Validation::new(config.jwt_algorithm);
        // No grace period: a token is expired the moment its `exp` passes.
        validation.leeway = 0;

        Self {
            header: Header::new(config.jwt_algorithm),
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl_minutes: config.token_ttl_minutes,
        }
    }

    /// Issue a signed token for a user.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue(&self, user_id: UserId, role: UserRole) -> Result<String, TokenError> {
        let expires_at = Utc::now() + Duration::minutes(self.ttl_minutes);
        let claims = Claims {
            user_id,
            user_role: role,
            exp: expires_at.timestamp(),
        };

        encode(&self.header, &claims, &self.encoding).map_err(TokenError::Signing)
    }

    /// Verify a token and return its claims.
    ///
    /// A successful verification does NOT guarantee the subject still
    /// exists; callers must re-resolve the user and report the subject as
    /// missing themselves.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` if the embedded expiry has passed, and
    /// `TokenError::Invalid` for any other verification failure.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use jsonwebtoken::Algorithm;
    use secrecy::SecretString;

    use super::*;

    fn test_config(ttl_minutes: i64) -> AuthConfig {
        AuthConfig {
            jwt_secret: SecretString::from("fJ8#kQ2!mW9$xR4@vL7&nT1*pZ6^bE3%"),
            jwt_algorithm: Algorithm::HS256,
            token_ttl_minutes: ttl_minutes,
        }
    }

    #[test]
    fn test_issue_then_verify_returns_identity() {
        let tokens = TokenService::new(&test_config(15));

        let token = tokens.issue(UserId::new(7), UserRole::Customer).unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.user_id, UserId::new(7));
        assert_eq!(claims.user_role, UserRole::Customer);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_verify_preserves_role() {
        let tokens = TokenService::new(&test_config(15));

        let token = tokens.issue(UserId::new(1), UserRole::Admin).unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.user_role, UserRole::Admin);
    }

    #[test]
    fn test_expired_token_is_distinct_from_invalid() {
        // Negative TTL puts the expiry in the past at issue time.
        let tokens = TokenService::new(&test_config(-5));

        let token = tokens.issue(UserId::new(7), UserRole::Customer).unwrap();
        let err = tokens.verify(&token).unwrap_err();

        assert!(matches!(err, TokenError::Expired));
    }

    #[test]
    fn test_foreign_key_fails_as_invalid() {
        let issuer = TokenService::new(&test_config(15));
        let verifier = TokenService::new(&AuthConfig {
            jwt_secret: SecretString::from("Qz5&wX8!rV2#tY6$uI9@oP3*aS7^dF1%"),
            jwt_algorithm: Algorithm::HS256,
            token_ttl_minutes: 15,
        });

        let token = issuer.issue(UserId::new(7), UserRole::Customer).unwrap();
        let err = verifier.verify(&token).unwrap_err();

        assert!(matches!(err, TokenError::Invalid));
    }

    #[test]
    fn test_malformed_token_fails_as_invalid() {
        let tokens = TokenService::new(&test_config(15));

        assert!(matches!(
            tokens.verify("not-a-token").unwrap_err(),
            TokenError::Invalid
        ));
        assert!(matches!(
            tokens.verify("").unwrap_err(),
            TokenError::Invalid
        ));
    }

    #[test]
    fn test_missing_claims_fail_as_invalid() {
        #[derive(serde::Serialize)]
        struct BareClaims {
            exp: i64,
        }

        let config = test_config(15);
        let tokens = TokenService::new(&config);

        // Signed with the right key but carrying no identity claims.
        let bare = encode(
            &Header::new(Algorithm::HS256),
            &BareClaims {
                exp: (Utc::now() + Duration::minutes(15)).timestamp(),
            },
            &EncodingKey::from_secret(config.jwt_secret.expose_secret().as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            tokens.verify(&bare).unwrap_err(),
            TokenError::Invalid
        ));
    }

    #[test]
    fn test_algorithm_mismatch_fails_as_invalid() {
        let issuer = TokenService::new(&AuthConfig {
            jwt_algorithm: Algorithm::HS512,
            ..test_config(15)
        });
        let verifier = TokenService::new(&test_config(15));

        let token = issuer.issue(UserId::new(7), UserRole::Customer).unwrap();

        assert!(matches!(
            verifier.verify(&token).unwrap_err(),
            TokenError::Invalid
        ));
    }
}
