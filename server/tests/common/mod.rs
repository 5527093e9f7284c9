//! Shared test fixtures: temp-dir database plus seed helpers.

#![allow(dead_code)]

use ops_server::db::DbService;
use ops_server::db::repository::{product, store};
use shared::models::{Product, ProductCreate, Store, StoreCreate, StoreStatus, Weekday};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Fresh migrated database in a temp dir. Keep the `TempDir` alive for the
/// duration of the test or the database file disappears underneath the pool.
pub async fn test_pool() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let db_path = dir.path().join("test.db");
    let db = DbService::new(db_path.to_str().expect("utf-8 temp path"))
        .await
        .expect("open test database");
    (dir, db.pool)
}

pub async fn seed_store(pool: &SqlitePool, name: &str) -> Store {
    store::create(
        pool,
        StoreCreate {
            name: name.to_string(),
            owner_name: "Test Owner".to_string(),
            address: "1 Main Street".to_string(),
            contact: None,
            email: None,
            delivery_day: Weekday::Monday,
            status: StoreStatus::Active,
            latitude: None,
            longitude: None,
            hours: None,
        },
    )
    .await
    .expect("seed store")
}

pub async fn seed_product(pool: &SqlitePool, code: &str, price_cents: i64) -> Product {
    product::create(
        pool,
        ProductCreate {
            product_code: code.to_string(),
            name: format!("Product {code}"),
            description: None,
            price_cents,
            size: None,
        },
    )
    .await
    .expect("seed product")
}
