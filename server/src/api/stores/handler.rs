//! Store API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::store;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{Store, StoreCreate, StoreUpdate};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i32,
    #[serde(default)]
    pub offset: i32,
    /// Archived stores are hidden unless requested
    #[serde(default)]
    pub include_archived: bool,
}

fn default_limit() -> i32 {
    50
}

/// GET /api/stores
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Store>>> {
    let stores = store::find_all(
        &state.pool,
        query.include_archived,
        query.limit,
        query.offset,
    )
    .await?;
    Ok(Json(stores))
}

/// GET /api/stores/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Store>> {
    let found = store::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Store {id} not found")))?;
    Ok(Json(found))
}

fn validate_payload_texts(
    name: Option<&String>,
    owner_name: Option<&String>,
    address: Option<&String>,
    contact: &Option<String>,
    email: &Option<String>,
    hours: &Option<String>,
) -> AppResult<()> {
    if let Some(name) = name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(owner) = owner_name
        && owner.len() > MAX_NAME_LEN
    {
        return Err(AppError::validation("owner_name is too long"));
    }
    if let Some(address) = address
        && address.len() > MAX_ADDRESS_LEN
    {
        return Err(AppError::validation("address is too long"));
    }
    validate_optional_text(contact, "contact", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(email, "email", MAX_EMAIL_LEN)?;
    validate_optional_text(hours, "hours", MAX_SHORT_TEXT_LEN)?;
    Ok(())
}

/// POST /api/stores
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<StoreCreate>,
) -> AppResult<Json<Store>> {
    validate_payload_texts(
        Some(&payload.name),
        Some(&payload.owner_name),
        Some(&payload.address),
        &payload.contact,
        &payload.email,
        &payload.hours,
    )?;

    let created = store::create(&state.pool, payload).await?;
    tracing::info!(store_id = created.id, name = %created.name, "Store created");
    Ok(Json(created))
}

/// PUT /api/stores/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<StoreUpdate>,
) -> AppResult<Json<Store>> {
    validate_payload_texts(
        payload.name.as_ref(),
        payload.owner_name.as_ref(),
        payload.address.as_ref(),
        &payload.contact,
        &payload.email,
        &payload.hours,
    )?;

    let updated = store::update(&state.pool, id, payload).await?;
    Ok(Json(updated))
}

/// POST /api/stores/:id/archive
pub async fn archive(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Store>> {
    let updated = store::set_archived(&state.pool, id, true).await?;
    tracing::info!(store_id = id, "Store archived");
    Ok(Json(updated))
}

/// POST /api/stores/:id/unarchive
pub async fn unarchive(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Store>> {
    let updated = store::set_archived(&state.pool, id, false).await?;
    Ok(Json(updated))
}

/// DELETE /api/stores/:id
///
/// Fails with a conflict when orders still reference the store; archiving
/// is the non-destructive alternative.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    store::delete(&state.pool, id).await?;
    tracing::info!(store_id = id, "Store deleted");
    Ok(Json(true))
}
