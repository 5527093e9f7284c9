//! Data models
//!
//! Shared between the server and API consumers.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY, snowflake-generated).

pub mod inventory;
pub mod order;
pub mod product;
pub mod store;
pub mod user;

// Re-exports
pub use inventory::*;
pub use order::*;
pub use product::*;
pub use store::*;
pub use user::*;
