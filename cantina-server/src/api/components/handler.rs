//! Component & Variant API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{
    Component, ComponentCreate, ComponentUpdate, Variant, VariantCreate, VariantUpdate,
};
use crate::db::repository::{ComponentRepository, RepoError, VariantRepository};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateComponentRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateVariantRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(range(min = 0))]
    pub stock_quantity: Option<i32>,
    pub is_active: Option<bool>,
}

/// GET /api/components - 组件列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Component>>> {
    let components = ComponentRepository::new(state.db.clone()).find_all().await?;
    Ok(Json(components))
}

/// GET /api/components/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Component>> {
    let component = ComponentRepository::new(state.db.clone())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::ComponentNotFound, format!("Component {} not found", id))
        })?;
    Ok(Json(component))
}

/// POST /api/components - 创建组件
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateComponentRequest>,
) -> AppResult<Json<Component>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let created = ComponentRepository::new(state.db.clone())
        .create(ComponentCreate { name: payload.name })
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::ComponentNameExists, msg),
            other => other.into(),
        })?;
    Ok(Json(created))
}

/// PUT /api/components/:id - 更新组件
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ComponentUpdate>,
) -> AppResult<Json<Component>> {
    let updated = ComponentRepository::new(state.db.clone())
        .update(&id, payload)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::ComponentNameExists, msg),
            other => other.into(),
        })?;
    Ok(Json(updated))
}

/// DELETE /api/components/:id - 删除组件 (有变体时拒绝)
pub async fn delete_component(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let repo = ComponentRepository::new(state.db.clone());
    repo.find_by_id(&id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::ComponentNotFound, format!("Component {} not found", id))
    })?;

    let variants = VariantRepository::new(state.db.clone())
        .find_by_component(&id)
        .await?;
    if !variants.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::ConflictingState,
            format!("Component has {} variants", variants.len()),
        ));
    }

    repo.delete(&id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// GET /api/components/:id/variants - 组件下的变体列表
pub async fn list_variants(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Variant>>> {
    let variants = VariantRepository::new(state.db.clone())
        .find_by_component(&id)
        .await?;
    Ok(Json(variants))
}

/// POST /api/components/:id/variants - 创建变体
pub async fn create_variant(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CreateVariantRequest>,
) -> AppResult<Json<Variant>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let component = ComponentRepository::new(state.db.clone())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::ComponentNotFound, format!("Component {} not found", id))
        })?;
    let component_id = component
        .id
        .as_ref()
        .map(|i| i.to_string())
        .unwrap_or_default();

    let created = VariantRepository::new(state.db.clone())
        .create(
            &component_id,
            VariantCreate {
                name: payload.name,
                stock_quantity: payload.stock_quantity,
                is_active: payload.is_active,
            },
        )
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::VariantNameExists, msg),
            other => other.into(),
        })?;
    Ok(Json(created))
}

/// PUT /api/variants/:id - 更新变体
pub async fn update_variant(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<VariantUpdate>,
) -> AppResult<Json<Variant>> {
    let updated = VariantRepository::new(state.db.clone())
        .update(&id, payload)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::VariantNameExists, msg),
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::VariantNotFound, msg),
            other => other.into(),
        })?;
    Ok(Json(updated))
}

/// DELETE /api/variants/:id - 删除变体
///
/// 被任何订单引用的变体不可删除，保证账单历史可追溯。
pub async fn delete_variant(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let repo = VariantRepository::new(state.db.clone());
    repo.find_by_id(&id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::VariantNotFound, format!("Variant {} not found", id))
    })?;

    let references = repo.count_order_references(&id).await?;
    if references > 0 {
        return Err(AppError::with_message(
            ErrorCode::VariantReferencedByOrders,
            format!("Variant is referenced by {} orders", references),
        ));
    }

    repo.delete(&id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}
