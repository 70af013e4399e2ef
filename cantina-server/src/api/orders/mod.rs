//! Order API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_operator;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    // 员工路由: 下单、查看/取消自己的订单
    let employee_routes = Router::new()
        .route("/", post(handler::place))
        .route("/mine", get(handler::list_mine))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/cancel", post(handler::cancel));

    // 运营方: 全量订单列表
    let operator_routes = Router::new()
        .route("/", get(handler::list_all))
        .layer(middleware::from_fn(require_operator));

    employee_routes.merge(operator_routes)
}
