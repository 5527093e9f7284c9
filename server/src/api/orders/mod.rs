//! Order API module

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/items", post(handler::add_item))
        .route(
            "/{id}/items/{item_id}",
            put(handler::update_item).delete(handler::remove_item),
        )
        .route("/{id}/transition", post(handler::transition))
}
