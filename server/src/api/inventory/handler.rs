//! Inventory API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::inventory;
use crate::utils::validation::{MAX_NOTE_LEN, parse_quantity, validate_optional_text};
use crate::utils::{AppError, AppResult};
use shared::models::{
    Inventory, InventoryTransaction, InventoryUpdate, InventoryView, RestockRequest,
};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i32,
    #[serde(default)]
    pub offset: i32,
}

#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    #[serde(default = "default_limit")]
    pub limit: i32,
    #[serde(default)]
    pub offset: i32,
    pub product_id: Option<i64>,
}

fn default_limit() -> i32 {
    50
}

/// GET /api/inventory - stock levels for active products
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<InventoryView>>> {
    let rows = inventory::find_all(&state.pool, query.limit, query.offset).await?;
    Ok(Json(rows))
}

/// GET /api/inventory/low-stock - active products at or below threshold
pub async fn low_stock(State(state): State<ServerState>) -> AppResult<Json<Vec<InventoryView>>> {
    let rows = inventory::find_low_stock(&state.pool).await?;
    Ok(Json(rows))
}

/// GET /api/inventory/transactions - stock movement audit log
pub async fn transactions(
    State(state): State<ServerState>,
    Query(query): Query<TransactionQuery>,
) -> AppResult<Json<Vec<InventoryTransaction>>> {
    let rows =
        inventory::find_transactions(&state.pool, query.product_id, query.limit, query.offset)
            .await?;
    Ok(Json(rows))
}

/// GET /api/inventory/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Inventory>> {
    let found = inventory::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Inventory {id} not found")))?;
    Ok(Json(found))
}

/// PUT /api/inventory/:id - adjust the low-stock threshold
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<InventoryUpdate>,
) -> AppResult<Json<Inventory>> {
    let updated = inventory::update_threshold(&state.pool, id, payload.threshold).await?;
    Ok(Json(updated))
}

/// POST /api/inventory/:id/restock
///
/// The quantity arrives as raw JSON so `"5"` and `5` both work while
/// anything non-integer or non-positive is a validation error, leaving the
/// stock untouched.
pub async fn restock(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<RestockRequest>,
) -> AppResult<Json<Inventory>> {
    let quantity = parse_quantity(&payload.quantity, "quantity")?;
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    let updated = inventory::restock(
        &state.pool,
        id,
        quantity,
        Some(current_user.id),
        payload.notes,
    )
    .await?;

    tracing::info!(
        inventory_id = id,
        quantity,
        stock = updated.stock,
        username = %current_user.username,
        "Inventory restocked"
    );
    Ok(Json(updated))
}
