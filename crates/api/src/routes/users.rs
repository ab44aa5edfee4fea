//! User routes: login, signup, and account management.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use tradewind_core::{Email, UserId, UserRole};

use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::user::User;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Login credentials.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A freshly issued bearer token.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Signup payload.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

/// Profile replacement payload.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

/// Public user payload; never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: UserRole,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

/// Authenticate and issue a session token.
///
/// POST /users/login
///
/// # Errors
///
/// Returns 403 for unknown email or wrong password.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let auth = AuthService::new(state.pool());
    let user = auth.login(&req.email, &req.password).await?;

    let access_token = state
        .tokens()
        .issue(user.id, user.role)
        .map_err(AuthError::Token)?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// Register a new account.
///
/// POST /users/signup
///
/// # Errors
///
/// Returns 409 if the email is already registered.
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let auth = AuthService::new(state.pool());
    let user = auth
        .signup(&req.name, &req.email, &req.password, req.role)
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Fetch a user by ID.
///
/// GET /users/{id}
///
/// # Errors
///
/// Returns 404 if the user doesn't exist.
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UserResponse>> {
    let user = UserRepository::new(state.pool())
        .get_by_id(UserId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user with id {id} does not exist")))?;

    Ok(Json(user.into()))
}

/// Replace the current user's profile.
///
/// PUT /users/update
///
/// # Errors
///
/// Returns 409 if the new email belongs to another user.
pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>> {
    let auth = AuthService::new(state.pool());
    let updated = auth
        .update_profile(&user, &req.name, &req.email, &req.password, req.role)
        .await?;

    Ok(Json(updated.into()))
}

/// Delete the current user's account.
///
/// DELETE /users/delete
///
/// Returns the deleted user's payload.
///
/// # Errors
///
/// Returns 404 if the account was already deleted.
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<UserResponse>> {
    let auth = AuthService::new(state.pool());
    auth.delete_account(user.id).await?;

    Ok(Json(user.into()))
}
