//! Invoice API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_operator;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/invoices", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/generate", post(handler::generate))
        .route("/generate-business", post(handler::generate_for_business))
        .route("/{id}/pay", post(handler::mark_paid))
        .layer(middleware::from_fn(require_operator))
}
