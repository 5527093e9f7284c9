//! Order domain logic
//!
//! Pure money arithmetic lives here; persistence and the status machine
//! wiring live in `db::repository::order`.

pub mod money;

pub use money::{OrderTotals, line_total_cents, order_totals};
