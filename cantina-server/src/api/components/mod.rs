//! Component & Variant Catalog API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::require_operator;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/components", get(handler::list))
        .route("/components/{id}", get(handler::get_by_id))
        .route("/components/{id}/variants", get(handler::list_variants));

    let write_routes = Router::new()
        .route("/components", post(handler::create))
        .route("/components/{id}", put(handler::update))
        .route("/components/{id}", delete(handler::delete_component))
        .route("/components/{id}/variants", post(handler::create_variant))
        .route("/variants/{id}", put(handler::update_variant))
        .route("/variants/{id}", delete(handler::delete_variant))
        .layer(middleware::from_fn(require_operator));

    read_routes.merge(write_routes)
}
