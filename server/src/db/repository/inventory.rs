//! Inventory Repository
//!
//! Stock mutations are additive SQL updates inside transactions, so
//! concurrent restocks serialize at the storage layer instead of racing
//! read-modify-write in the application. Every successful mutation appends
//! an inventory_transaction row in the same transaction.

use super::{RepoError, RepoResult};
use shared::models::{Inventory, InventoryTransaction, InventoryView, TransactionType};
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, product_id, stock, threshold, last_updated";

const VIEW_QUERY: &str = "SELECT i.id, i.product_id, p.product_code, p.name AS product_name, i.stock, i.threshold, (i.stock <= i.threshold) AS is_low_stock, i.last_updated FROM inventory i JOIN product p ON p.id = i.product_id";

const TX_COLUMNS: &str =
    "id, product_id, transaction_type, quantity, notes, recorded_by, created_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Inventory>> {
    let inventory =
        sqlx::query_as::<_, Inventory>(&format!("SELECT {COLUMNS} FROM inventory WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(inventory)
}

pub async fn find_by_product(pool: &SqlitePool, product_id: i64) -> RepoResult<Option<Inventory>> {
    let inventory = sqlx::query_as::<_, Inventory>(&format!(
        "SELECT {COLUMNS} FROM inventory WHERE product_id = ?"
    ))
    .bind(product_id)
    .fetch_optional(pool)
    .await?;
    Ok(inventory)
}

/// List inventory for active products, joined with product identity.
pub async fn find_all(pool: &SqlitePool, limit: i32, offset: i32) -> RepoResult<Vec<InventoryView>> {
    let rows = sqlx::query_as::<_, InventoryView>(&format!(
        "{VIEW_QUERY} WHERE p.is_active = 1 ORDER BY p.name LIMIT ? OFFSET ?"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// List active products at or below their low-stock threshold.
pub async fn find_low_stock(pool: &SqlitePool) -> RepoResult<Vec<InventoryView>> {
    let rows = sqlx::query_as::<_, InventoryView>(&format!(
        "{VIEW_QUERY} WHERE p.is_active = 1 AND i.stock <= i.threshold ORDER BY p.name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Adjust the low-stock threshold. Stock itself is never written directly;
/// it moves through restock and order fulfillment.
pub async fn update_threshold(pool: &SqlitePool, id: i64, threshold: i64) -> RepoResult<Inventory> {
    if threshold < 0 {
        return Err(RepoError::Validation(format!(
            "Threshold must not be negative, got {threshold}"
        )));
    }
    let rows = sqlx::query("UPDATE inventory SET threshold = ?1 WHERE id = ?2")
        .bind(threshold)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Inventory {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Inventory {id} not found")))
}

/// Add stock. One transaction covers the additive stock update and the
/// `increase` audit row; a validation failure leaves both untouched.
pub async fn restock(
    pool: &SqlitePool,
    id: i64,
    quantity: i64,
    recorded_by: Option<i64>,
    notes: Option<String>,
) -> RepoResult<Inventory> {
    if quantity <= 0 {
        return Err(RepoError::Validation(format!(
            "Quantity must be positive, got {quantity}"
        )));
    }

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    // Additive update, and the transaction's first statement so the write
    // lock is taken up front: concurrent restocks queue and both land
    let rows = sqlx::query(
        "UPDATE inventory SET stock = stock + ?1, last_updated = ?2 WHERE id = ?3",
    )
    .bind(quantity)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Inventory {id} not found")));
    }

    let product_id: i64 = sqlx::query_scalar("SELECT product_id FROM inventory WHERE id = ?")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

    record_transaction(
        &mut tx,
        product_id,
        TransactionType::Increase,
        quantity,
        recorded_by,
        notes,
        now,
    )
    .await?;

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Inventory {id} not found")))
}

/// Deduct stock inside an already-open transaction (order fulfillment).
///
/// The guarded update refuses to take stock below zero; the caller rolls
/// the surrounding transaction back on error, so no partial deduction and
/// no audit row survive a failure.
pub(crate) async fn deduct_in_tx(
    tx: &mut SqliteConnection,
    product_id: i64,
    quantity: i64,
    recorded_by: Option<i64>,
    notes: Option<String>,
    now: i64,
) -> RepoResult<()> {
    if quantity <= 0 {
        return Err(RepoError::Validation(format!(
            "Quantity must be positive, got {quantity}"
        )));
    }

    let rows = sqlx::query(
        "UPDATE inventory SET stock = stock - ?1, last_updated = ?2 WHERE product_id = ?3 AND stock >= ?1",
    )
    .bind(quantity)
    .bind(now)
    .bind(product_id)
    .execute(&mut *tx)
    .await?;

    if rows.rows_affected() == 0 {
        let stock: Option<i64> =
            sqlx::query_scalar("SELECT stock FROM inventory WHERE product_id = ?")
                .bind(product_id)
                .fetch_optional(&mut *tx)
                .await?;
        return Err(match stock {
            Some(stock) => RepoError::InsufficientStock(format!(
                "Product {product_id}: have {stock}, need {quantity}"
            )),
            None => RepoError::NotFound(format!("No inventory for product {product_id}")),
        });
    }

    record_transaction(
        tx,
        product_id,
        TransactionType::Decrease,
        quantity,
        recorded_by,
        notes,
        now,
    )
    .await
}

/// Append an audit row. Always called inside the mutating transaction.
async fn record_transaction(
    tx: &mut SqliteConnection,
    product_id: i64,
    transaction_type: TransactionType,
    quantity: i64,
    recorded_by: Option<i64>,
    notes: Option<String>,
    now: i64,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO inventory_transaction (id, product_id, transaction_type, quantity, notes, recorded_by, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(shared::util::snowflake_id())
    .bind(product_id)
    .bind(transaction_type)
    .bind(quantity)
    .bind(&notes)
    .bind(recorded_by)
    .bind(now)
    .execute(&mut *tx)
    .await?;
    Ok(())
}

/// List stock movements, newest first, optionally scoped to one product.
pub async fn find_transactions(
    pool: &SqlitePool,
    product_id: Option<i64>,
    limit: i32,
    offset: i32,
) -> RepoResult<Vec<InventoryTransaction>> {
    let rows = sqlx::query_as::<_, InventoryTransaction>(&format!(
        "SELECT {TX_COLUMNS} FROM inventory_transaction WHERE (?1 IS NULL OR product_id = ?1) ORDER BY created_at DESC, id DESC LIMIT ?2 OFFSET ?3"
    ))
    .bind(product_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
