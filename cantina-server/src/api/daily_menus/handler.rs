//! Daily Menu API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{DailyMenu, MenuVariant};
use crate::db::repository::DailyMenuRepository;
use crate::menus::MenuManager;
use crate::utils::{AppError, AppResult, time};

/// Query params for listing menus
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

#[derive(Debug, Deserialize)]
pub struct CreateMenuRequest {
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct AddPackRequest {
    pub pack_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AttachServiceRequest {
    pub service_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AddVariantRequest {
    pub variant_id: String,
    pub initial_stock: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCutoffRequest {
    pub cutoff_hour: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub force: bool,
}

/// Menu with its variant activations
#[derive(Debug, Serialize)]
pub struct MenuDetail {
    #[serde(flatten)]
    pub menu: DailyMenu,
    pub variants: Vec<MenuVariant>,
}

/// Publish result: the menu plus non-blocking composition warnings
#[derive(Debug, Serialize)]
pub struct PublishResponse {
    #[serde(flatten)]
    pub menu: DailyMenu,
    pub warnings: Vec<String>,
}

/// POST /api/daily-menus - 创建某日期的菜单草稿
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateMenuRequest>,
) -> AppResult<Json<DailyMenu>> {
    let menu = MenuManager::new(&state).create(&payload.date).await?;
    Ok(Json(menu))
}

/// GET /api/daily-menus - 菜单列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<DailyMenu>>> {
    let repo = DailyMenuRepository::new(state.db.clone());
    let menus = repo.find_all(query.limit, query.offset).await?;
    Ok(Json(menus))
}

/// GET /api/daily-menus/:id - 菜单详情 (含变体激活)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<MenuDetail>> {
    let repo = DailyMenuRepository::new(state.db.clone());
    let menu = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu {}", id)))?;
    let variants = MenuManager::new(&state).variants(&menu).await?;
    Ok(Json(MenuDetail { menu, variants }))
}

/// GET /api/daily-menus/date/:date - 按日期取菜单
pub async fn get_by_date(
    State(state): State<ServerState>,
    Path(date): Path<String>,
) -> AppResult<Json<MenuDetail>> {
    let repo = DailyMenuRepository::new(state.db.clone());
    let menu = repo
        .find_by_date(&date)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu for {}", date)))?;
    let variants = MenuManager::new(&state).variants(&menu).await?;
    Ok(Json(MenuDetail { menu, variants }))
}

/// POST /api/daily-menus/:id/publish - 发布菜单 (返回编排警告)
pub async fn publish(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<PublishResponse>> {
    let (menu, warnings) = MenuManager::new(&state)
        .publish(&id, time::now_millis())
        .await?;
    Ok(Json(PublishResponse { menu, warnings }))
}

/// POST /api/daily-menus/:id/unpublish - 退回草稿
pub async fn unpublish(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<DailyMenu>> {
    let menu = MenuManager::new(&state).unpublish(&id).await?;
    Ok(Json(menu))
}

/// POST /api/daily-menus/:id/lock - 锁定菜单 (截单后)
pub async fn lock(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<DailyMenu>> {
    let menu = MenuManager::new(&state).lock(&id, time::now_millis()).await?;
    Ok(Json(menu))
}

/// POST /api/daily-menus/:id/unlock - 解锁菜单
pub async fn unlock(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<DailyMenu>> {
    let menu = MenuManager::new(&state).unlock(&id).await?;
    Ok(Json(menu))
}

/// DELETE /api/daily-menus/:id?force= - 删除菜单
pub async fn delete_menu(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> AppResult<Json<serde_json::Value>> {
    MenuManager::new(&state).delete(&id, query.force).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// POST /api/daily-menus/:id/packs - 添加套餐 (快照价格)
pub async fn add_pack(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<AddPackRequest>,
) -> AppResult<Json<DailyMenu>> {
    let menu = MenuManager::new(&state).add_pack(&id, &payload.pack_id).await?;
    Ok(Json(menu))
}

/// POST /api/daily-menus/:id/services - 挂接餐段
pub async fn attach_service(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<AttachServiceRequest>,
) -> AppResult<Json<DailyMenu>> {
    let menu = MenuManager::new(&state)
        .attach_service(&id, &payload.service_id)
        .await?;
    Ok(Json(menu))
}

/// POST /api/daily-menus/:id/variants - 激活变体并设定当日库存
pub async fn add_variant(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<AddVariantRequest>,
) -> AppResult<Json<MenuVariant>> {
    let row = MenuManager::new(&state)
        .add_variant(&id, &payload.variant_id, payload.initial_stock)
        .await?;
    Ok(Json(row))
}

/// DELETE /api/daily-menus/:id/variants/:variant_id - 移除变体激活 (仅草稿)
pub async fn remove_variant(
    State(state): State<ServerState>,
    Path((id, variant_id)): Path<(String, String)>,
) -> AppResult<Json<serde_json::Value>> {
    MenuManager::new(&state).remove_variant(&id, &variant_id).await?;
    Ok(Json(serde_json::json!({ "removed": true })))
}

/// PUT /api/daily-menus/:id/cutoff - 修改截单时间
pub async fn update_cutoff(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCutoffRequest>,
) -> AppResult<Json<DailyMenu>> {
    let menu = MenuManager::new(&state)
        .update_cutoff(&id, &payload.cutoff_hour)
        .await?;
    Ok(Json(menu))
}
