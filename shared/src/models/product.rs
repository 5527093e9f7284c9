//! Product Model

use crate::money;
use serde::{Deserialize, Serialize};

/// Product record
///
/// Every product owns exactly one inventory record, provisioned in the same
/// transaction that creates the product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    /// External catalog identity, unique
    pub product_code: String,
    pub name: String,
    pub description: Option<String>,
    /// Unit price in cents, rendered as a decimal string on the wire
    #[serde(rename = "price", with = "money::serde_cents")]
    pub price_cents: i64,
    /// Pack size, free text (e.g. "330ml", "6x1L")
    pub size: Option<String>,
    /// Soft-delete flag: inactive products keep their inventory and order history
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create product payload
#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreate {
    pub product_code: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "price", with = "money::serde_cents")]
    pub price_cents: i64,
    pub size: Option<String>,
}

/// Update product payload
///
/// Price changes never rewrite the `unit_price` snapshots on existing
/// order items.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(
        default,
        rename = "price",
        with = "money::serde_cents_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub price_cents: Option<i64>,
    pub size: Option<String>,
    pub is_active: Option<bool>,
}
