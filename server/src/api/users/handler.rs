//! User API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::hash_password;
use crate::core::ServerState;
use crate::db::repository::user;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{User, UserCreate, UserUpdate};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i32,
    #[serde(default)]
    pub offset: i32,
}

fn default_limit() -> i32 {
    50
}

/// GET /api/users
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<User>>> {
    let users = user::find_all(&state.pool, query.limit, query.offset).await?;
    Ok(Json(users))
}

/// GET /api/users/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<User>> {
    let found = user::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
    Ok(Json(found))
}

/// POST /api/users
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<User>> {
    validate_required_text(&payload.username, "username", MAX_NAME_LEN)?;
    validate_required_text(&payload.password, "password", MAX_PASSWORD_LEN)?;
    validate_optional_text(&payload.phone_number, "phone_number", MAX_SHORT_TEXT_LEN)?;
    if payload.email.len() > MAX_EMAIL_LEN {
        return Err(AppError::validation("email is too long"));
    }

    let password_hash = hash_password(&payload.password)?;
    let created = user::create(&state.pool, payload, password_hash).await?;

    tracing::info!(user_id = created.id, username = %created.username, "User created");
    Ok(Json(created))
}

/// PUT /api/users/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<User>> {
    validate_optional_text(&payload.password, "password", MAX_PASSWORD_LEN)?;
    validate_optional_text(&payload.phone_number, "phone_number", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.email, "email", MAX_EMAIL_LEN)?;

    let password_hash = match &payload.password {
        Some(p) if !p.is_empty() => Some(hash_password(p)?),
        Some(_) => return Err(AppError::validation("password must not be empty")),
        None => None,
    };

    let updated = user::update(&state.pool, id, payload, password_hash).await?;
    Ok(Json(updated))
}

/// DELETE /api/users/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    user::delete(&state.pool, id).await?;
    tracing::info!(user_id = id, "User deleted");
    Ok(Json(true))
}
