//! Order API Handlers
//!
//! Item-mutating endpoints return the whole order so callers always see
//! the freshly recomputed totals.

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::order;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{
    Order, OrderCreate, OrderItemCreate, OrderItemUpdate, OrderStatus, OrderUpdate,
    OrderWithItems, TransitionRequest,
};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i32,
    #[serde(default)]
    pub offset: i32,
    pub status: Option<OrderStatus>,
    pub store_id: Option<i64>,
}

fn default_limit() -> i32 {
    50
}

/// GET /api/orders
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = order::find_all(
        &state.pool,
        query.status,
        query.store_id,
        query.limit,
        query.offset,
    )
    .await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderWithItems>> {
    let found = order::find_with_items(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
    Ok(Json(found))
}

/// POST /api/orders
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<OrderWithItems>> {
    if let Some(number) = &payload.order_number {
        validate_required_text(number, "order_number", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;

    let created = order::create(&state.pool, payload, Some(current_user.id)).await?;
    tracing::info!(
        order_id = created.order.id,
        order_number = %created.order.order_number,
        username = %current_user.username,
        "Order created"
    );
    Ok(Json(created))
}

/// PUT /api/orders/:id - header fields only
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<OrderWithItems>> {
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;
    let updated = order::update(&state.pool, id, payload).await?;
    Ok(Json(updated))
}

/// DELETE /api/orders/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    order::delete(&state.pool, id).await?;
    tracing::info!(order_id = id, "Order deleted");
    Ok(Json(true))
}

/// POST /api/orders/:id/items - add an item (or replace its quantity)
pub async fn add_item(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderItemCreate>,
) -> AppResult<Json<OrderWithItems>> {
    let updated = order::add_item(&state.pool, id, payload).await?;
    Ok(Json(updated))
}

/// PUT /api/orders/:id/items/:item_id - change an item's quantity
pub async fn update_item(
    State(state): State<ServerState>,
    Path((id, item_id)): Path<(i64, i64)>,
    Json(payload): Json<OrderItemUpdate>,
) -> AppResult<Json<OrderWithItems>> {
    let updated = order::update_item(&state.pool, id, item_id, payload.quantity).await?;
    Ok(Json(updated))
}

/// DELETE /api/orders/:id/items/:item_id
pub async fn remove_item(
    State(state): State<ServerState>,
    Path((id, item_id)): Path<(i64, i64)>,
) -> AppResult<Json<OrderWithItems>> {
    let updated = order::remove_item(&state.pool, id, item_id).await?;
    Ok(Json(updated))
}

/// POST /api/orders/:id/transition
///
/// Completing an order deducts stock for every line item atomically with
/// the status write.
pub async fn transition(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<TransitionRequest>,
) -> AppResult<Json<OrderWithItems>> {
    let updated =
        order::transition(&state.pool, id, payload.status, Some(current_user.id)).await?;
    tracing::info!(
        order_id = id,
        status = updated.order.status.as_str(),
        username = %current_user.username,
        "Order status changed"
    );
    Ok(Json(updated))
}
