//! Order aggregate behavior: derived totals, price snapshots and the
//! status machine.

mod common;

use common::{seed_product, seed_store, test_pool};
use ops_server::db::repository::{RepoError, order, product, store};
use shared::models::{
    OrderCreate, OrderItemCreate, OrderStatus, ProductUpdate,
};

async fn empty_order(pool: &sqlx::SqlitePool, store_id: i64) -> shared::models::OrderWithItems {
    order::create(
        pool,
        OrderCreate {
            order_number: None,
            store_id,
            delivery_day: None,
            note: None,
            items: vec![],
        },
        None,
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn totals_follow_item_mutations() {
    let (_dir, pool) = test_pool().await;
    let store = seed_store(&pool, "Totals Shop").await;
    let coffee = seed_product(&pool, "SKU-COFFEE", 12_34).await;
    let tea = seed_product(&pool, "SKU-TEA", 7_00).await;

    let created = empty_order(&pool, store.id).await;
    assert_eq!(created.order.total_cents, 0);

    // 2 x 12.34 = 24.68, tax 0.49 (half-up from 0.4936), total 25.17
    let with_coffee = order::add_item(
        &pool,
        created.order.id,
        OrderItemCreate {
            product_id: coffee.id,
            quantity: 2,
        },
    )
    .await
    .unwrap();
    assert_eq!(with_coffee.order.subtotal_cents, 24_68);
    assert_eq!(with_coffee.order.tax_cents, 49);
    assert_eq!(with_coffee.order.total_cents, 25_17);

    // + 1 x 7.00 -> 31.68, tax 0.63 (half-up from 0.6336), total 32.31
    let with_tea = order::add_item(
        &pool,
        created.order.id,
        OrderItemCreate {
            product_id: tea.id,
            quantity: 1,
        },
    )
    .await
    .unwrap();
    assert_eq!(with_tea.order.subtotal_cents, 31_68);
    assert_eq!(with_tea.order.tax_cents, 63);
    assert_eq!(with_tea.order.total_cents, 32_31);
    assert_eq!(
        with_tea.order.total_cents,
        with_tea.order.subtotal_cents + with_tea.order.tax_cents
    );

    let coffee_item = with_tea
        .items
        .iter()
        .find(|i| i.product_id == coffee.id)
        .unwrap();
    let shrunk = order::update_item(&pool, created.order.id, coffee_item.id, 1)
        .await
        .unwrap();
    assert_eq!(shrunk.order.subtotal_cents, 19_34);

    let tea_item = shrunk.items.iter().find(|i| i.product_id == tea.id).unwrap();
    let removed = order::remove_item(&pool, created.order.id, tea_item.id)
        .await
        .unwrap();
    assert_eq!(removed.items.len(), 1);
    assert_eq!(removed.order.subtotal_cents, 12_34);
    assert_eq!(
        removed.order.total_cents,
        removed.order.subtotal_cents + removed.order.tax_cents
    );
}

#[tokio::test]
async fn adding_existing_product_replaces_quantity_and_keeps_snapshot() {
    let (_dir, pool) = test_pool().await;
    let store = seed_store(&pool, "Snapshot Shop").await;
    let item = seed_product(&pool, "SKU-SNAP", 10_00).await;

    let created = order::create(
        &pool,
        OrderCreate {
            order_number: None,
            store_id: store.id,
            delivery_day: None,
            note: None,
            items: vec![OrderItemCreate {
                product_id: item.id,
                quantity: 2,
            }],
        },
        None,
    )
    .await
    .unwrap();

    // Price change after the order exists: snapshot must not move
    product::update(
        &pool,
        item.id,
        ProductUpdate {
            price_cents: Some(12_50),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let again = order::add_item(
        &pool,
        created.order.id,
        OrderItemCreate {
            product_id: item.id,
            quantity: 5,
        },
    )
    .await
    .unwrap();
    assert_eq!(again.items.len(), 1);
    assert_eq!(again.items[0].quantity, 5);
    assert_eq!(again.items[0].unit_price_cents, 10_00);
    assert_eq!(again.order.subtotal_cents, 50_00);

    // A fresh order sees the new price
    let fresh = order::create(
        &pool,
        OrderCreate {
            order_number: None,
            store_id: store.id,
            delivery_day: None,
            note: None,
            items: vec![OrderItemCreate {
                product_id: item.id,
                quantity: 1,
            }],
        },
        None,
    )
    .await
    .unwrap();
    assert_eq!(fresh.items[0].unit_price_cents, 12_50);
}

#[tokio::test]
async fn status_machine_rejects_invalid_moves() {
    let (_dir, pool) = test_pool().await;
    let store = seed_store(&pool, "Status Shop").await;
    let created = empty_order(&pool, store.id).await;

    // Pending cannot skip to completed
    let err = order::transition(&pool, created.order.id, OrderStatus::Completed, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidTransition(_)));

    order::transition(&pool, created.order.id, OrderStatus::Cancelled, None)
        .await
        .unwrap();

    // Terminal: no further transitions, items frozen
    for next in [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ] {
        let err = order::transition(&pool, created.order.id, next, None)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::InvalidTransition(_)));
    }

    let item = seed_product(&pool, "SKU-FROZEN", 1_00).await;
    let err = order::add_item(
        &pool,
        created.order.id,
        OrderItemCreate {
            product_id: item.id,
            quantity: 1,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepoError::InvalidTransition(_)));
}

#[tokio::test]
async fn order_item_validation() {
    let (_dir, pool) = test_pool().await;
    let store = seed_store(&pool, "Validation Shop").await;
    let item = seed_product(&pool, "SKU-VAL", 1_00).await;
    let created = empty_order(&pool, store.id).await;

    let err = order::add_item(
        &pool,
        created.order.id,
        OrderItemCreate {
            product_id: item.id,
            quantity: 0,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let err = order::add_item(
        &pool,
        created.order.id,
        OrderItemCreate {
            product_id: 999_999,
            quantity: 1,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));

    // Inactive products cannot join new orders
    product::update(
        &pool,
        item.id,
        ProductUpdate {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let err = order::add_item(
        &pool,
        created.order.id,
        OrderItemCreate {
            product_id: item.id,
            quantity: 1,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[tokio::test]
async fn archived_store_rejects_new_orders() {
    let (_dir, pool) = test_pool().await;
    let shop = seed_store(&pool, "Archive Shop").await;
    let existing = empty_order(&pool, shop.id).await;

    store::set_archived(&pool, shop.id, true).await.unwrap();

    let err = order::create(
        &pool,
        OrderCreate {
            order_number: None,
            store_id: shop.id,
            delivery_day: None,
            note: None,
            items: vec![],
        },
        None,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    // Existing orders survive archiving
    let still_there = order::find_by_id(&pool, existing.order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(still_there.id, existing.order.id);

    // Archived stores stay out of default listings
    let listed = store::find_all(&pool, false, 50, 0).await.unwrap();
    assert!(listed.iter().all(|s| s.id != shop.id));
    let all = store::find_all(&pool, true, 50, 0).await.unwrap();
    assert!(all.iter().any(|s| s.id == shop.id));
}

#[tokio::test]
async fn custom_order_numbers_are_unique() {
    let (_dir, pool) = test_pool().await;
    let store = seed_store(&pool, "Numbered Shop").await;

    order::create(
        &pool,
        OrderCreate {
            order_number: Some("SO-CUSTOM-1".to_string()),
            store_id: store.id,
            delivery_day: None,
            note: None,
            items: vec![],
        },
        None,
    )
    .await
    .unwrap();

    let err = order::create(
        &pool,
        OrderCreate {
            order_number: Some("SO-CUSTOM-1".to_string()),
            store_id: store.id,
            delivery_day: None,
            note: None,
            items: vec![],
        },
        None,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));
}
