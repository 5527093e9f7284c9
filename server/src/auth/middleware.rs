//! Authentication middleware
//!
//! `require_auth` runs on every request: it validates the bearer token and
//! injects [`CurrentUser`] into request extensions. Public paths (login,
//! health) and non-API paths pass through untouched.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// Paths reachable without a token
const PUBLIC_PATHS: &[&str] = &["/api/auth/login", "/api/health"];

/// JWT authentication middleware
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // CORS preflight never carries credentials
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let path = req.uri().path();
    if !path.starts_with("/api/") || PUBLIC_PATHS.contains(&path) {
        return Ok(next.run(req).await);
    }

    let token = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(JwtService::extract_from_header)
        .ok_or(AppError::Unauthorized)?;

    let claims = state.jwt_service.validate_token(token).map_err(|e| {
        security_log!("warn", "token_rejected", path = req.uri().path());
        match e {
            JwtError::Expired => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        }
    })?;

    let current_user = JwtService::current_user(&claims).map_err(|_| AppError::InvalidToken)?;
    req.extensions_mut().insert(current_user);

    Ok(next.run(req).await)
}

/// Admin-only guard, layered onto individual routes
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::Unauthorized)?;

    if !user.is_admin() {
        security_log!(
            "warn",
            "admin_access_denied",
            username = user.username.as_str(),
            path = req.uri().path()
        );
        return Err(AppError::forbidden(
            "Administrator privileges required".to_string(),
        ));
    }

    Ok(next.run(req).await)
}
