//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::product;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{Product, ProductCreate, ProductUpdate};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i32,
    #[serde(default)]
    pub offset: i32,
    /// Deactivated products are hidden unless requested
    #[serde(default)]
    pub include_inactive: bool,
}

fn default_limit() -> i32 {
    50
}

/// GET /api/products
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let products = product::find_all(
        &state.pool,
        query.include_inactive,
        query.limit,
        query.offset,
    )
    .await?;
    Ok(Json(products))
}

/// GET /api/products/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    let found = product::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))?;
    Ok(Json(found))
}

/// POST /api/products
///
/// Creates the product and its inventory record as one atomic unit.
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    validate_required_text(&payload.product_code, "product_code", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.size, "size", MAX_SHORT_TEXT_LEN)?;

    let created = product::create(&state.pool, payload).await?;
    tracing::info!(product_id = created.id, code = %created.product_code, "Product created");
    Ok(Json(created))
}

/// PUT /api/products/:id
///
/// Price changes only affect items added afterwards; existing order items
/// keep their snapshot.
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.size, "size", MAX_SHORT_TEXT_LEN)?;

    let updated = product::update(&state.pool, id, payload).await?;
    Ok(Json(updated))
}

/// DELETE /api/products/:id
///
/// Hard delete; fails with a conflict when order items still reference the
/// product. Deactivation (`is_active = false`) is the soft alternative.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    product::delete(&state.pool, id).await?;
    tracing::info!(product_id = id, "Product deleted");
    Ok(Json(true))
}
