//! Daily Menu API 模块 (每日菜单)

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::require_operator;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/daily-menus", routes())
}

fn routes() -> Router<ServerState> {
    // 员工可读 (选餐页面需要看到菜单)
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/date/{date}", get(handler::get_by_date));

    // 编排与状态转换仅限运营方
    let write_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}/publish", post(handler::publish))
        .route("/{id}/unpublish", post(handler::unpublish))
        .route("/{id}/lock", post(handler::lock))
        .route("/{id}/unlock", post(handler::unlock))
        .route("/{id}", delete(handler::delete_menu))
        .route("/{id}/packs", post(handler::add_pack))
        .route("/{id}/services", post(handler::attach_service))
        .route("/{id}/variants", post(handler::add_variant))
        .route("/{id}/variants/{variant_id}", delete(handler::remove_variant))
        .route("/{id}/cutoff", put(handler::update_cutoff))
        .layer(middleware::from_fn(require_operator));

    read_routes.merge(write_routes)
}
