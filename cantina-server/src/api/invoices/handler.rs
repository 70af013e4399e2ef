//! Invoice API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::Invoice;
use crate::invoicing::InvoiceService;
use crate::utils::{AppResult, time};

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub period_start: String,
    pub period_end: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateBusinessRequest {
    pub business_id: String,
    pub period_start: Option<String>,
    pub period_end: Option<String>,
}

/// POST /api/invoices/generate - 为区间内所有企业生成发票
pub async fn generate(
    State(state): State<ServerState>,
    Json(payload): Json<GenerateRequest>,
) -> AppResult<Json<Vec<Invoice>>> {
    let invoices = InvoiceService::new(&state)
        .generate(&payload.period_start, &payload.period_end, time::now_millis())
        .await?;
    Ok(Json(invoices))
}

/// POST /api/invoices/generate-business - 为单个企业生成发票
///
/// 不带区间时结算该企业所有未开票的已锁定订单。
pub async fn generate_for_business(
    State(state): State<ServerState>,
    Json(payload): Json<GenerateBusinessRequest>,
) -> AppResult<Json<Vec<Invoice>>> {
    let invoices = InvoiceService::new(&state)
        .generate_for_business(
            &payload.business_id,
            payload.period_start,
            payload.period_end,
            time::now_millis(),
        )
        .await?;
    Ok(Json(invoices))
}

/// GET /api/invoices - 发票列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Invoice>>> {
    let invoices = InvoiceService::new(&state).list().await?;
    Ok(Json(invoices))
}

/// GET /api/invoices/:id - 单张发票
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Invoice>> {
    let invoice = InvoiceService::new(&state).get(&id).await?;
    Ok(Json(invoice))
}

/// POST /api/invoices/:id/pay - 标记已支付
pub async fn mark_paid(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Invoice>> {
    let invoice = InvoiceService::new(&state).mark_paid(&id).await?;
    Ok(Json(invoice))
}
