//! HTTP API modules
//!
//! One module per resource, each exposing `router()` which nests its routes
//! under `/api/<resource>`.

pub mod auth;
pub mod health;
pub mod inventory;
pub mod orders;
pub mod products;
pub mod stores;
pub mod users;
