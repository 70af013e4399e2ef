//! Kitchen API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::kitchen::{BusinessSummary, DetailedSummary, KitchenService, KitchenSummary};
use crate::utils::AppResult;

/// GET /api/kitchen/:date/summary - 按 (套餐, 组件, 变体) 汇总
pub async fn summary(
    State(state): State<ServerState>,
    Path(date): Path<String>,
) -> AppResult<Json<KitchenSummary>> {
    let summary = KitchenService::new(&state).summary(&date).await?;
    Ok(Json(summary))
}

/// GET /api/kitchen/:date/business-summary - 按企业拆分
pub async fn business_summary(
    State(state): State<ServerState>,
    Path(date): Path<String>,
) -> AppResult<Json<BusinessSummary>> {
    let summary = KitchenService::new(&state).business_summary(&date).await?;
    Ok(Json(summary))
}

/// GET /api/kitchen/:date/detailed-summary - 主厨明细
pub async fn detailed_summary(
    State(state): State<ServerState>,
    Path(date): Path<String>,
) -> AppResult<Json<DetailedSummary>> {
    let summary = KitchenService::new(&state).detailed_summary(&date).await?;
    Ok(Json(summary))
}
