//! Inventory API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/inventory", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/low-stock", get(handler::low_stock))
        .route("/transactions", get(handler::transactions))
        .route("/{id}", get(handler::get_by_id).put(handler::update))
        .route("/{id}/restock", post(handler::restock))
}
