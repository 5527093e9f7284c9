//! Product API module

mod handler;

use axum::{
    Router,
    handler::Handler,
    middleware as axum_middleware,
    routing::get,
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id).put(handler::update).delete(
                // Hard delete is destructive; deactivation is open to all roles
                handler::delete.layer(axum_middleware::from_fn(require_admin)),
            ),
        )
}
