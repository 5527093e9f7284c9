//! Product Repository
//!
//! Product creation provisions the inventory record in the same
//! transaction: a product must never exist without one.

use super::{RepoError, RepoResult};
use shared::models::{Product, ProductCreate, ProductUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str =
    "id, product_code, name, description, price_cents, size, is_active, created_at, updated_at";

/// Default low-stock threshold for freshly provisioned inventory
pub const DEFAULT_THRESHOLD: i64 = 10;

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let product =
        sqlx::query_as::<_, Product>(&format!("SELECT {COLUMNS} FROM product WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(product)
}

pub async fn find_by_code(pool: &SqlitePool, code: &str) -> RepoResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {COLUMNS} FROM product WHERE product_code = ?"
    ))
    .bind(code)
    .fetch_optional(pool)
    .await?;
    Ok(product)
}

/// List products. Inactive products only show up when explicitly requested.
pub async fn find_all(
    pool: &SqlitePool,
    include_inactive: bool,
    limit: i32,
    offset: i32,
) -> RepoResult<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(&format!(
        "SELECT {COLUMNS} FROM product WHERE (?1 OR is_active = 1) ORDER BY name LIMIT ?2 OFFSET ?3"
    ))
    .bind(include_inactive)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(products)
}

/// Create a product and its inventory record as one atomic unit
/// (stock 0, threshold 10).
pub async fn create(pool: &SqlitePool, data: ProductCreate) -> RepoResult<Product> {
    if data.price_cents < 0 {
        return Err(RepoError::Validation(format!(
            "Price must not be negative, got {}",
            shared::money::format_cents(data.price_cents)
        )));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let inventory_id = shared::util::snowflake_id();

    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO product (id, product_code, name, description, price_cents, size, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?7)",
    )
    .bind(id)
    .bind(&data.product_code)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price_cents)
    .bind(&data.size)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO inventory (id, product_id, stock, threshold, last_updated) VALUES (?1, ?2, 0, ?3, ?4)",
    )
    .bind(inventory_id)
    .bind(id)
    .bind(DEFAULT_THRESHOLD)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

/// Update a product. Price changes apply to future order items only; the
/// `unit_price` snapshots on existing items are never rewritten.
pub async fn update(pool: &SqlitePool, id: i64, data: ProductUpdate) -> RepoResult<Product> {
    if let Some(price) = data.price_cents
        && price < 0
    {
        return Err(RepoError::Validation(format!(
            "Price must not be negative, got {}",
            shared::money::format_cents(price)
        )));
    }

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE product SET name = COALESCE(?1, name), description = COALESCE(?2, description), price_cents = COALESCE(?3, price_cents), size = COALESCE(?4, size), is_active = COALESCE(?5, is_active), updated_at = ?6 WHERE id = ?7",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price_cents)
    .bind(&data.size)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

/// Hard delete. Cascades to the inventory record and its transaction log;
/// order items keep their price snapshots but block deletion via the
/// foreign key when history must be preserved.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM product WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    Ok(())
}
