//! Authentication Handlers
//!
//! Handles login and caller identity

use std::time::Duration;

use axum::{Extension, Json, extract::State};

use crate::auth::{CurrentUser, verify_password};
use crate::core::ServerState;
use crate::db::repository::user;
use crate::security_log;
use crate::utils::{AppError, AppResult};
use shared::models::{LoginRequest, LoginResponse, User};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /api/auth/login
///
/// Authenticates user credentials and returns a JWT token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let username = req.username.clone();
    let found = user::find_by_username(&state.pool, &username).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent username enumeration
    let account = match found {
        Some(u) => {
            if !u.is_active {
                return Err(AppError::forbidden("Account has been disabled".to_string()));
            }
            if !verify_password(&req.password, &u.password_hash)? {
                security_log!("warn", "login_failed", username = username.as_str());
                tracing::warn!(username = %username, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }
            u
        }
        None => {
            security_log!("warn", "login_failed", username = username.as_str());
            tracing::warn!(username = %username, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let token = state
        .jwt_service
        .generate_token(account.id, &account.username, account.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    security_log!("info", "login_success", username = account.username.as_str());
    tracing::info!(
        user_id = account.id,
        username = %account.username,
        role = account.role.as_str(),
        "User logged in successfully"
    );

    Ok(Json(LoginResponse {
        token,
        user: account,
    }))
}

/// GET /api/auth/me - the authenticated caller's account
pub async fn me(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<User>> {
    let account = user::find_by_id(&state.pool, current_user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Account no longer exists".to_string()))?;
    Ok(Json(account))
}
