//! Order Repository
//!
//! The order header's monetary fields are derived state: every item
//! mutation runs inside one transaction that writes the item and recomputes
//! subtotal/tax/total before committing, so totals are never observable
//! stale. Fulfillment (transition to completed) deducts stock for every
//! line item in the same transaction as the status write.

use super::{RepoError, RepoResult, inventory};
use crate::orders::money;
use shared::models::{
    Order, OrderCreate, OrderItem, OrderItemCreate, OrderStatus, OrderUpdate, OrderWithItems,
};
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, order_number, store_id, status, delivery_day, subtotal_cents, tax_cents, total_cents, note, created_by, created_at, updated_at";

const ITEM_COLUMNS: &str =
    "id, order_id, product_id, quantity, unit_price_cents, total_cents, created_at, updated_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!("SELECT {COLUMNS} FROM orders WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(order)
}

pub async fn find_items(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM order_item WHERE order_id = ? ORDER BY created_at, id"
    ))
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

pub async fn find_with_items(pool: &SqlitePool, id: i64) -> RepoResult<Option<OrderWithItems>> {
    let Some(order) = find_by_id(pool, id).await? else {
        return Ok(None);
    };
    let items = find_items(pool, id).await?;
    Ok(Some(OrderWithItems { order, items }))
}

/// List orders, newest first, optionally filtered by status and store.
pub async fn find_all(
    pool: &SqlitePool,
    status: Option<OrderStatus>,
    store_id: Option<i64>,
    limit: i32,
    offset: i32,
) -> RepoResult<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT {COLUMNS} FROM orders WHERE (?1 IS NULL OR status = ?1) AND (?2 IS NULL OR store_id = ?2) ORDER BY created_at DESC, id DESC LIMIT ?3 OFFSET ?4"
    ))
    .bind(status)
    .bind(store_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(orders)
}

/// Create an order, optionally with initial items. One transaction covers
/// the header, all items and the totals recompute.
pub async fn create(
    pool: &SqlitePool,
    data: OrderCreate,
    created_by: Option<i64>,
) -> RepoResult<OrderWithItems> {
    let archived: Option<bool> = sqlx::query_scalar("SELECT is_archived FROM store WHERE id = ?")
        .bind(data.store_id)
        .fetch_optional(pool)
        .await?;
    match archived {
        None => {
            return Err(RepoError::NotFound(format!(
                "Store {} not found",
                data.store_id
            )));
        }
        Some(true) => {
            return Err(RepoError::Validation(format!(
                "Store {} is archived",
                data.store_id
            )));
        }
        Some(false) => {}
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let order_number = data
        .order_number
        .clone()
        .unwrap_or_else(|| format!("SO-{id}"));

    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO orders (id, order_number, store_id, status, delivery_day, subtotal_cents, tax_cents, total_cents, note, created_by, created_at, updated_at) VALUES (?1, ?2, ?3, 'pending', ?4, 0, 0, 0, ?5, ?6, ?7, ?7)",
    )
    .bind(id)
    .bind(&order_number)
    .bind(data.store_id)
    .bind(data.delivery_day)
    .bind(&data.note)
    .bind(created_by)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    for item in &data.items {
        upsert_item_in_tx(&mut tx, id, item, now).await?;
    }
    if !data.items.is_empty() {
        recalculate_totals_in_tx(&mut tx, id, now).await?;
    }

    tx.commit().await?;

    find_with_items(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".into()))
}

/// Update header fields (delivery day, note). Status and totals have their
/// own paths.
pub async fn update(pool: &SqlitePool, id: i64, data: OrderUpdate) -> RepoResult<OrderWithItems> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE orders SET delivery_day = COALESCE(?1, delivery_day), note = COALESCE(?2, note), updated_at = ?3 WHERE id = ?4",
    )
    .bind(data.delivery_day)
    .bind(&data.note)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    find_with_items(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    Ok(())
}

/// Add a line item, or replace the quantity if the order already has one
/// for that product (the original price snapshot is kept). Totals are
/// recomputed before the transaction commits.
pub async fn add_item(
    pool: &SqlitePool,
    order_id: i64,
    item: OrderItemCreate,
) -> RepoResult<OrderWithItems> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    ensure_mutable(lock_order_in_tx(&mut tx, order_id).await?)?;
    upsert_item_in_tx(&mut tx, order_id, &item, now).await?;
    recalculate_totals_in_tx(&mut tx, order_id, now).await?;

    tx.commit().await?;

    find_with_items(pool, order_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} not found")))
}

/// Change a line item's quantity. The unit price stays at its creation-time
/// snapshot; only the quantity and the derived totals move.
pub async fn update_item(
    pool: &SqlitePool,
    order_id: i64,
    item_id: i64,
    quantity: i64,
) -> RepoResult<OrderWithItems> {
    if quantity <= 0 {
        return Err(RepoError::Validation(format!(
            "Quantity must be positive, got {quantity}"
        )));
    }

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    ensure_mutable(lock_order_in_tx(&mut tx, order_id).await?)?;

    let rows = sqlx::query(
        "UPDATE order_item SET quantity = ?1, total_cents = ?1 * unit_price_cents, updated_at = ?2 WHERE id = ?3 AND order_id = ?4",
    )
    .bind(quantity)
    .bind(now)
    .bind(item_id)
    .bind(order_id)
    .execute(&mut *tx)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Item {item_id} not found on order {order_id}"
        )));
    }

    recalculate_totals_in_tx(&mut tx, order_id, now).await?;
    tx.commit().await?;

    find_with_items(pool, order_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} not found")))
}

/// Remove a line item and recompute totals in the same transaction.
pub async fn remove_item(
    pool: &SqlitePool,
    order_id: i64,
    item_id: i64,
) -> RepoResult<OrderWithItems> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    ensure_mutable(lock_order_in_tx(&mut tx, order_id).await?)?;

    let rows = sqlx::query("DELETE FROM order_item WHERE id = ?1 AND order_id = ?2")
        .bind(item_id)
        .bind(order_id)
        .execute(&mut *tx)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Item {item_id} not found on order {order_id}"
        )));
    }

    recalculate_totals_in_tx(&mut tx, order_id, now).await?;
    tx.commit().await?;

    find_with_items(pool, order_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} not found")))
}

/// Drive the status machine.
///
/// Transitioning to completed deducts every line item's quantity from
/// inventory inside the same transaction as the status write. Any
/// insufficient-stock failure rolls everything back: no partial deduction,
/// no status change, no audit rows. The guarded status update turns a
/// concurrent modification into a conflict instead of a lost update.
pub async fn transition(
    pool: &SqlitePool,
    id: i64,
    next: OrderStatus,
    recorded_by: Option<i64>,
) -> RepoResult<OrderWithItems> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let current = lock_order_in_tx(&mut tx, id).await?;
    let order_number: String = sqlx::query_scalar("SELECT order_number FROM orders WHERE id = ?")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

    if !current.can_transition_to(next) {
        return Err(RepoError::InvalidTransition(format!(
            "Order {order_number}: {} -> {} is not allowed",
            current.as_str(),
            next.as_str()
        )));
    }

    if next == OrderStatus::Completed {
        let items = items_in_tx(&mut tx, id).await?;
        for item in &items {
            inventory::deduct_in_tx(
                &mut tx,
                item.product_id,
                item.quantity,
                recorded_by,
                Some(format!("Order {order_number} fulfillment")),
                now,
            )
            .await?;
        }
    }

    let rows = sqlx::query(
        "UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4",
    )
    .bind(next)
    .bind(now)
    .bind(id)
    .bind(current)
    .execute(&mut *tx)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::Conflict(format!(
            "Order {order_number} was modified concurrently"
        )));
    }

    tx.commit().await?;

    find_with_items(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}

// ========== Transaction-scoped helpers ==========

/// Take the write lock as the transaction's first statement and return the
/// order's status. A no-op touch update makes the deferred transaction a
/// writer up front, so a concurrent mutator queues on the busy timeout
/// instead of failing on a stale read snapshot. Doubles as the existence
/// check.
async fn lock_order_in_tx(tx: &mut SqliteConnection, order_id: i64) -> RepoResult<OrderStatus> {
    let rows = sqlx::query("UPDATE orders SET updated_at = updated_at WHERE id = ?")
        .bind(order_id)
        .execute(&mut *tx)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {order_id} not found")));
    }
    let status: OrderStatus = sqlx::query_scalar("SELECT status FROM orders WHERE id = ?")
        .bind(order_id)
        .fetch_one(&mut *tx)
        .await?;
    Ok(status)
}

/// Items of a terminal order are frozen.
fn ensure_mutable(status: OrderStatus) -> RepoResult<()> {
    if status.is_terminal() {
        return Err(RepoError::InvalidTransition(format!(
            "Order is {}, items can no longer change",
            status.as_str()
        )));
    }
    Ok(())
}

async fn items_in_tx(tx: &mut SqliteConnection, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM order_item WHERE order_id = ? ORDER BY created_at, id"
    ))
    .bind(order_id)
    .fetch_all(&mut *tx)
    .await?;
    Ok(items)
}

/// Insert a line item with the product's current price snapshotted, or
/// replace the quantity on conflict while keeping the original snapshot.
async fn upsert_item_in_tx(
    tx: &mut SqliteConnection,
    order_id: i64,
    item: &OrderItemCreate,
    now: i64,
) -> RepoResult<()> {
    if item.quantity <= 0 {
        return Err(RepoError::Validation(format!(
            "Quantity must be positive, got {}",
            item.quantity
        )));
    }

    let product: Option<(i64, bool)> =
        sqlx::query_as("SELECT price_cents, is_active FROM product WHERE id = ?")
            .bind(item.product_id)
            .fetch_optional(&mut *tx)
            .await?;
    let (price_cents, is_active) = product
        .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", item.product_id)))?;
    if !is_active {
        return Err(RepoError::Validation(format!(
            "Product {} is inactive",
            item.product_id
        )));
    }

    sqlx::query(
        "INSERT INTO order_item (id, order_id, product_id, quantity, unit_price_cents, total_cents, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7) ON CONFLICT(order_id, product_id) DO UPDATE SET quantity = excluded.quantity, total_cents = excluded.quantity * order_item.unit_price_cents, updated_at = excluded.updated_at",
    )
    .bind(shared::util::snowflake_id())
    .bind(order_id)
    .bind(item.product_id)
    .bind(item.quantity)
    .bind(price_cents)
    .bind(money::line_total_cents(item.quantity, price_cents))
    .bind(now)
    .execute(&mut *tx)
    .await?;
    Ok(())
}

/// Recompute subtotal/tax/total from the order's current items and persist
/// them on the header. Runs inside every item-mutating transaction.
async fn recalculate_totals_in_tx(
    tx: &mut SqliteConnection,
    order_id: i64,
    now: i64,
) -> RepoResult<()> {
    let item_totals: Vec<i64> =
        sqlx::query_scalar("SELECT total_cents FROM order_item WHERE order_id = ?")
            .bind(order_id)
            .fetch_all(&mut *tx)
            .await?;

    let totals = money::order_totals(&item_totals);

    sqlx::query(
        "UPDATE orders SET subtotal_cents = ?1, tax_cents = ?2, total_cents = ?3, updated_at = ?4 WHERE id = ?5",
    )
    .bind(totals.subtotal_cents)
    .bind(totals.tax_cents)
    .bind(totals.total_cents)
    .bind(now)
    .bind(order_id)
    .execute(&mut *tx)
    .await?;
    Ok(())
}
