//! Pack Catalog API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_operator;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/packs", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id));

    let write_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update))
        .route("/{id}/components", put(handler::add_components))
        .layer(middleware::from_fn(require_operator));

    read_routes.merge(write_routes)
}
