//! Day Operations API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::day_lock::{DayLockService, DayStatus, LockDayResult};
use crate::db::models::DayLock;
use crate::utils::{AppResult, time};

/// GET /api/days/:date - 日状态 (锁定、窗口、菜单状态)
pub async fn status(
    State(state): State<ServerState>,
    Path(date): Path<String>,
) -> AppResult<Json<DayStatus>> {
    let status = DayLockService::new(&state).status(&date).await?;
    Ok(Json(status))
}

/// POST /api/days/:date/lock - 锁定当日全部订单
pub async fn lock_day(
    State(state): State<ServerState>,
    Path(date): Path<String>,
) -> AppResult<Json<LockDayResult>> {
    let result = DayLockService::new(&state)
        .lock_day(&date, time::now_millis())
        .await?;
    Ok(Json(result))
}

/// POST /api/days/:date/ordering/close - 手动关闭订餐窗口
pub async fn close_ordering(
    State(state): State<ServerState>,
    Path(date): Path<String>,
) -> AppResult<Json<DayLock>> {
    let row = DayLockService::new(&state).close_ordering(&date).await?;
    Ok(Json(row))
}

/// POST /api/days/:date/ordering/open - 重新打开订餐窗口
pub async fn open_ordering(
    State(state): State<ServerState>,
    Path(date): Path<String>,
) -> AppResult<Json<DayLock>> {
    let row = DayLockService::new(&state).open_ordering(&date).await?;
    Ok(Json(row))
}
