//! Kitchen API 模块 (后厨汇总)

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_operator;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/kitchen", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{date}/summary", get(handler::summary))
        .route("/{date}/business-summary", get(handler::business_summary))
        .route("/{date}/detailed-summary", get(handler::detailed_summary))
        .layer(middleware::from_fn(require_operator))
}
