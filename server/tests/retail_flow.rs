//! End-to-end retail flow over a real migrated database:
//! catalog -> restock -> order -> fulfillment, plus the inventory
//! consistency guarantees around it.

mod common;

use common::{seed_product, seed_store, test_pool};
use ops_server::db::repository::{RepoError, inventory, order, product};
use shared::models::{
    OrderCreate, OrderItemCreate, OrderStatus, ProductCreate, TransactionType,
};

#[tokio::test]
async fn full_flow_restock_order_fulfill() {
    let (_dir, pool) = test_pool().await;
    let store = seed_store(&pool, "Corner Shop").await;
    let product = seed_product(&pool, "SKU-001", 10_00).await;

    // Inventory is provisioned with the product: stock 0, threshold 10
    let inv = inventory::find_by_product(&pool, product.id)
        .await
        .unwrap()
        .expect("inventory auto-provisioned");
    assert_eq!(inv.stock, 0);
    assert_eq!(inv.threshold, 10);
    assert!(inv.is_low_stock());

    let inv = inventory::restock(&pool, inv.id, 50, None, Some("initial delivery".into()))
        .await
        .unwrap();
    assert_eq!(inv.stock, 50);

    // 3 x 10.00 -> subtotal 30.00, tax 0.60 (2%), total 30.60
    let created = order::create(
        &pool,
        OrderCreate {
            order_number: None,
            store_id: store.id,
            delivery_day: None,
            note: None,
            items: vec![OrderItemCreate {
                product_id: product.id,
                quantity: 3,
            }],
        },
        None,
    )
    .await
    .unwrap();
    assert_eq!(created.order.status, OrderStatus::Pending);
    assert_eq!(created.order.order_number, format!("SO-{}", created.order.id));
    assert_eq!(created.order.subtotal_cents, 30_00);
    assert_eq!(created.order.tax_cents, 60);
    assert_eq!(created.order.total_cents, 30_60);
    assert_eq!(created.items.len(), 1);
    assert_eq!(created.items[0].unit_price_cents, 10_00);

    let processing = order::transition(&pool, created.order.id, OrderStatus::Processing, None)
        .await
        .unwrap();
    assert_eq!(processing.order.status, OrderStatus::Processing);

    // Stock does not move until completion
    let inv = inventory::find_by_product(&pool, product.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(inv.stock, 50);

    let completed = order::transition(&pool, created.order.id, OrderStatus::Completed, None)
        .await
        .unwrap();
    assert_eq!(completed.order.status, OrderStatus::Completed);

    let inv = inventory::find_by_product(&pool, product.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(inv.stock, 47);

    // Fulfillment left a decrease audit row
    let txs = inventory::find_transactions(&pool, Some(product.id), 50, 0)
        .await
        .unwrap();
    let decrease = txs
        .iter()
        .find(|t| t.transaction_type == TransactionType::Decrease)
        .expect("decrease recorded");
    assert_eq!(decrease.quantity, 3);
    assert_eq!(
        decrease.notes.as_deref(),
        Some(format!("Order {} fulfillment", completed.order.order_number).as_str())
    );
}

#[tokio::test]
async fn restock_rejects_nonpositive_quantity_without_audit() {
    let (_dir, pool) = test_pool().await;
    let product = seed_product(&pool, "SKU-002", 5_00).await;
    let inv = inventory::find_by_product(&pool, product.id)
        .await
        .unwrap()
        .unwrap();

    let err = inventory::restock(&pool, inv.id, 0, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    let err = inventory::restock(&pool, inv.id, -5, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    // Failed restock: no stock movement, no audit row
    let inv = inventory::find_by_id(&pool, inv.id).await.unwrap().unwrap();
    assert_eq!(inv.stock, 0);
    let txs = inventory::find_transactions(&pool, Some(product.id), 50, 0)
        .await
        .unwrap();
    assert!(txs.is_empty());
}

#[tokio::test]
async fn insufficient_stock_rolls_fulfillment_back() {
    let (_dir, pool) = test_pool().await;
    let store = seed_store(&pool, "Small Shop").await;
    let product = seed_product(&pool, "SKU-003", 2_50).await;
    let inv = inventory::find_by_product(&pool, product.id)
        .await
        .unwrap()
        .unwrap();
    inventory::restock(&pool, inv.id, 2, None, None).await.unwrap();

    let created = order::create(
        &pool,
        OrderCreate {
            order_number: None,
            store_id: store.id,
            delivery_day: None,
            note: None,
            items: vec![OrderItemCreate {
                product_id: product.id,
                quantity: 5,
            }],
        },
        None,
    )
    .await
    .unwrap();
    order::transition(&pool, created.order.id, OrderStatus::Processing, None)
        .await
        .unwrap();

    let err = order::transition(&pool, created.order.id, OrderStatus::Completed, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::InsufficientStock(_)));

    // Everything rolled back: stock, status and the audit log
    let inv = inventory::find_by_id(&pool, inv.id).await.unwrap().unwrap();
    assert_eq!(inv.stock, 2);
    let after = order::find_by_id(&pool, created.order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.status, OrderStatus::Processing);
    let txs = inventory::find_transactions(&pool, Some(product.id), 50, 0)
        .await
        .unwrap();
    assert!(
        txs.iter()
            .all(|t| t.transaction_type == TransactionType::Increase)
    );
}

#[tokio::test]
async fn concurrent_restocks_both_land() {
    let (_dir, pool) = test_pool().await;
    let product = seed_product(&pool, "SKU-004", 1_00).await;
    let inv = inventory::find_by_product(&pool, product.id)
        .await
        .unwrap()
        .unwrap();

    let pool_a = pool.clone();
    let pool_b = pool.clone();
    let inv_id = inv.id;
    let a = tokio::spawn(async move { inventory::restock(&pool_a, inv_id, 5, None, None).await });
    let b = tokio::spawn(async move { inventory::restock(&pool_b, inv_id, 7, None, None).await });
    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();

    let inv = inventory::find_by_id(&pool, inv.id).await.unwrap().unwrap();
    assert_eq!(inv.stock, 12);

    let txs = inventory::find_transactions(&pool, Some(product.id), 50, 0)
        .await
        .unwrap();
    assert_eq!(txs.len(), 2);
}

#[tokio::test]
async fn concurrent_item_additions_both_land() {
    let (_dir, pool) = test_pool().await;
    let store = seed_store(&pool, "Busy Shop").await;
    let coffee = seed_product(&pool, "SKU-C", 1_00).await;
    let tea = seed_product(&pool, "SKU-T", 2_50).await;

    let created = order::create(
        &pool,
        OrderCreate {
            order_number: None,
            store_id: store.id,
            delivery_day: None,
            note: None,
            items: vec![],
        },
        None,
    )
    .await
    .unwrap();

    let order_id = created.order.id;
    let pool_a = pool.clone();
    let pool_b = pool.clone();
    let coffee_id = coffee.id;
    let tea_id = tea.id;
    let a = tokio::spawn(async move {
        order::add_item(
            &pool_a,
            order_id,
            OrderItemCreate {
                product_id: coffee_id,
                quantity: 1,
            },
        )
        .await
    });
    let b = tokio::spawn(async move {
        order::add_item(
            &pool_b,
            order_id,
            OrderItemCreate {
                product_id: tea_id,
                quantity: 2,
            },
        )
        .await
    });
    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();

    // Both additions are reflected in the final totals
    let final_order = order::find_with_items(&pool, order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(final_order.items.len(), 2);
    assert_eq!(final_order.order.subtotal_cents, 6_00);
    assert_eq!(
        final_order.order.total_cents,
        final_order.order.subtotal_cents + final_order.order.tax_cents
    );
}

#[tokio::test]
async fn duplicate_product_code_is_rejected() {
    let (_dir, pool) = test_pool().await;
    seed_product(&pool, "SKU-005", 3_00).await;

    let err = product::create(
        &pool,
        ProductCreate {
            product_code: "SKU-005".to_string(),
            name: "Duplicate".to_string(),
            description: None,
            price_cents: 4_00,
            size: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));
}

#[tokio::test]
async fn low_stock_listing_tracks_threshold() {
    let (_dir, pool) = test_pool().await;
    let low = seed_product(&pool, "SKU-LOW", 1_00).await;
    let ok = seed_product(&pool, "SKU-OK", 1_00).await;

    let low_inv = inventory::find_by_product(&pool, low.id).await.unwrap().unwrap();
    let ok_inv = inventory::find_by_product(&pool, ok.id).await.unwrap().unwrap();
    inventory::restock(&pool, low_inv.id, 10, None, None).await.unwrap();
    inventory::restock(&pool, ok_inv.id, 11, None, None).await.unwrap();

    // stock == threshold counts as low
    let listed = inventory::find_low_stock(&pool).await.unwrap();
    let ids: Vec<i64> = listed.iter().map(|v| v.product_id).collect();
    assert!(ids.contains(&low.id));
    assert!(!ids.contains(&ok.id));

    inventory::update_threshold(&pool, ok_inv.id, 20).await.unwrap();
    let listed = inventory::find_low_stock(&pool).await.unwrap();
    assert!(listed.iter().any(|v| v.product_id == ok.id));
}
