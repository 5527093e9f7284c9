//! Shared types for the retail operations backend
//!
//! Data models, money representation and small utilities used by both the
//! server and API consumers. DB row derives are gated behind the `db`
//! feature so frontend-facing builds stay free of sqlx.

pub mod models;
pub mod money;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
