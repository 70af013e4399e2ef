//! Day Operations API 模块 (日锁定与订餐窗口)

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_operator;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/days", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{date}", get(handler::status))
        .route("/{date}/lock", post(handler::lock_day))
        .route("/{date}/ordering/close", post(handler::close_ordering))
        .route("/{date}/ordering/open", post(handler::open_ordering))
        .layer(middleware::from_fn(require_operator))
}
