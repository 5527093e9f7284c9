//! Store Repository

use super::{RepoError, RepoResult};
use shared::models::{Store, StoreCreate, StoreUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, name, owner_name, address, contact, email, delivery_day, status, is_archived, latitude, longitude, hours, created_at, updated_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Store>> {
    let store = sqlx::query_as::<_, Store>(&format!("SELECT {COLUMNS} FROM store WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(store)
}

/// List stores. Archived stores only show up when explicitly requested.
pub async fn find_all(
    pool: &SqlitePool,
    include_archived: bool,
    limit: i32,
    offset: i32,
) -> RepoResult<Vec<Store>> {
    let stores = sqlx::query_as::<_, Store>(&format!(
        "SELECT {COLUMNS} FROM store WHERE (?1 OR is_archived = 0) ORDER BY name LIMIT ?2 OFFSET ?3"
    ))
    .bind(include_archived)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(stores)
}

pub async fn create(pool: &SqlitePool, data: StoreCreate) -> RepoResult<Store> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    sqlx::query(
        "INSERT INTO store (id, name, owner_name, address, contact, email, delivery_day, status, is_archived, latitude, longitude, hours, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0, ?9, ?10, ?11, ?12, ?12)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.owner_name)
    .bind(&data.address)
    .bind(&data.contact)
    .bind(&data.email)
    .bind(data.delivery_day)
    .bind(data.status)
    .bind(data.latitude)
    .bind(data.longitude)
    .bind(&data.hours)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create store".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: StoreUpdate) -> RepoResult<Store> {
    let now = shared::util::now_millis();

    let rows = sqlx::query(
        "UPDATE store SET name = COALESCE(?1, name), owner_name = COALESCE(?2, owner_name), address = COALESCE(?3, address), contact = COALESCE(?4, contact), email = COALESCE(?5, email), delivery_day = COALESCE(?6, delivery_day), status = COALESCE(?7, status), latitude = COALESCE(?8, latitude), longitude = COALESCE(?9, longitude), hours = COALESCE(?10, hours), updated_at = ?11 WHERE id = ?12",
    )
    .bind(&data.name)
    .bind(&data.owner_name)
    .bind(&data.address)
    .bind(&data.contact)
    .bind(&data.email)
    .bind(data.delivery_day)
    .bind(data.status)
    .bind(data.latitude)
    .bind(data.longitude)
    .bind(&data.hours)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Store {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Store {id} not found")))
}

/// Flip the archived flag. Archiving hides the store from default listings
/// without touching its order history.
pub async fn set_archived(pool: &SqlitePool, id: i64, archived: bool) -> RepoResult<Store> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE store SET is_archived = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(archived)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Store {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Store {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM store WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Store {id} not found")));
    }
    Ok(())
}
