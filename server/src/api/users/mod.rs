//! User API module (admin only)

mod handler;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::get,
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/users", routes())
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
        .route_layer(axum_middleware::from_fn(require_admin))
}
