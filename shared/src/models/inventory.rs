//! Inventory Model

use serde::{Deserialize, Serialize};

/// Inventory record - one per product, created with the product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Inventory {
    pub id: i64,
    pub product_id: i64,
    /// On-hand stock count, never negative
    pub stock: i64,
    /// Low-stock warning threshold
    pub threshold: i64,
    /// Refreshed on every stock mutation
    pub last_updated: i64,
}

impl Inventory {
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.threshold
    }
}

/// Inventory joined with its product, as returned by list endpoints
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct InventoryView {
    pub id: i64,
    pub product_id: i64,
    pub product_code: String,
    pub product_name: String,
    pub stock: i64,
    pub threshold: i64,
    pub is_low_stock: bool,
    pub last_updated: i64,
}

/// Stock movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Increase,
    Decrease,
}

/// Append-only stock movement record
///
/// Written in the same transaction as the stock mutation it describes; a
/// failed mutation leaves no transaction behind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct InventoryTransaction {
    pub id: i64,
    pub product_id: i64,
    pub transaction_type: TransactionType,
    pub quantity: i64,
    pub notes: Option<String>,
    /// Nulled if the recording user is later deleted
    pub recorded_by: Option<i64>,
    pub created_at: i64,
}

/// Restock request body
///
/// `quantity` is kept raw so a non-numeric value surfaces as a validation
/// error instead of a deserialization failure. `"5"` and `5` both parse.
#[derive(Debug, Clone, Deserialize)]
pub struct RestockRequest {
    pub quantity: serde_json::Value,
    pub notes: Option<String>,
}

/// Update inventory payload - only the threshold is directly writable,
/// stock moves through restock and order fulfillment
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryUpdate {
    pub threshold: i64,
}
