//! Order Model

use crate::money;
use serde::{Deserialize, Serialize};

use super::Weekday;

/// Order lifecycle status
///
/// ```text
/// Pending ──> Processing ──> Completed
///    │             │
///    └─────────────┴──> Cancelled
/// ```
///
/// Completed and Cancelled are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// No transition leaves a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Whether the status machine allows `self -> next`.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Processing) | (Processing, Completed) | (Pending | Processing, Cancelled)
        )
    }
}

/// Order header
///
/// The three monetary fields are derived from the line items and recomputed
/// inside every item-mutating transaction; callers never set them directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    /// Unique external order number
    pub order_number: String,
    pub store_id: i64,
    pub status: OrderStatus,
    pub delivery_day: Option<Weekday>,
    #[serde(rename = "subtotal", with = "money::serde_cents")]
    pub subtotal_cents: i64,
    #[serde(rename = "tax", with = "money::serde_cents")]
    pub tax_cents: i64,
    #[serde(rename = "total", with = "money::serde_cents")]
    pub total_cents: i64,
    pub note: Option<String>,
    /// Nulled if the creating user is later deleted
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order line item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    /// Product price at the time the item was created; later product price
    /// changes do not touch it
    #[serde(rename = "unit_price", with = "money::serde_cents")]
    pub unit_price_cents: i64,
    #[serde(rename = "total", with = "money::serde_cents")]
    pub total_cents: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order header plus its line items, as returned by the API
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Create order payload
#[derive(Debug, Clone, Deserialize)]
pub struct OrderCreate {
    /// Generated from the order ID when omitted
    pub order_number: Option<String>,
    pub store_id: i64,
    pub delivery_day: Option<Weekday>,
    pub note: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItemCreate>,
}

/// Update order payload (header fields only; items have their own endpoints)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderUpdate {
    pub delivery_day: Option<Weekday>,
    pub note: Option<String>,
}

/// Add (or replace) a line item
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemCreate {
    pub product_id: i64,
    pub quantity: i64,
}

/// Change a line item's quantity
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemUpdate {
    pub quantity: i64,
}

/// Requested status transition
#[derive(Debug, Clone, Deserialize)]
pub struct TransitionRequest {
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::OrderStatus::*;

    #[test]
    fn forward_path_is_allowed() {
        assert!(Pending.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Completed));
    }

    #[test]
    fn cancellation_from_open_states() {
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Processing.can_transition_to(Cancelled));
    }

    #[test]
    fn terminal_states_admit_nothing() {
        for from in [Completed, Cancelled] {
            assert!(from.is_terminal());
            for to in [Pending, Processing, Completed, Cancelled] {
                assert!(!from.can_transition_to(to));
            }
        }
    }

    #[test]
    fn no_skipping_or_rewinding() {
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Processing.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Pending));
    }
}
