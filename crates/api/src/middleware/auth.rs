//! Authentication extractors.
//!
//! Provides extractors for requiring a bearer token in route handlers. A
//! token is verified (signature + expiry), then its subject is re-resolved
//! against the user table: a valid token whose user has since been deleted
//! is rejected.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};

use crate::error::AppError;
use crate::models::user::User;
use crate::services::auth::token::TokenError;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     CurrentUser(user): CurrentUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token =
            bearer_token(&parts.headers).ok_or(AuthError::Token(TokenError::Invalid))?;

        // Pure check: signature + expiry. Never touches the store.
        let claims = state.tokens().verify(token).map_err(AuthError::Token)?;

        // The subject may have been deleted since the token was issued.
        let user = AuthService::new(state.pool())
            .resolve_subject(claims.user_id)
            .await?;

        Ok(Self(user))
    }
}

/// Extractor that requires a valid bearer token belonging to an admin.
pub struct CurrentAdmin(pub User);

impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if !user.role.is_admin() {
            return Err(AppError::Forbidden(
                "only admins can access this endpoint".to_string(),
            ));
        }

        Ok(Self(user))
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_bearer_token_extracted() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );

        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );

        assert_eq!(bearer_token(&headers), None);
    }
}
