//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Order;
use crate::intake::{OrderIntake, PlaceOrder};
use crate::utils::{AppResult, time};

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// POST /api/orders - 下单
pub async fn place(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<PlaceOrder>,
) -> AppResult<Json<Order>> {
    let order = OrderIntake::new(&state)
        .place(&user, payload, time::now_millis())
        .await?;
    Ok(Json(order))
}

/// GET /api/orders/mine - 自己的订单
pub async fn list_mine(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    let orders = OrderIntake::new(&state).list_mine(&user).await?;
    Ok(Json(orders))
}

/// GET /api/orders - 全量订单 (运营方)
pub async fn list_all(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = OrderIntake::new(&state)
        .list_all(query.limit, query.offset)
        .await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id - 单个订单
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = OrderIntake::new(&state).get(&user, &id).await?;
    Ok(Json(order))
}

/// POST /api/orders/:id/cancel - 取消订单 (恢复库存)
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = OrderIntake::new(&state)
        .cancel(&user, &id, time::now_millis())
        .await?;
    Ok(Json(order))
}
