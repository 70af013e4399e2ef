//! Pack API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Pack, PackComponent, PackCreate, PackUpdate};
use crate::db::repository::{ComponentRepository, PackRepository, RepoError};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePackRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub price: Decimal,
    pub components: Option<Vec<PackComponent>>,
}

#[derive(Debug, Deserialize)]
pub struct AddComponentsRequest {
    pub components: Vec<PackComponent>,
}

/// GET /api/packs - 套餐列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Pack>>> {
    let packs = PackRepository::new(state.db.clone()).find_all().await?;
    Ok(Json(packs))
}

/// GET /api/packs/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Pack>> {
    let pack = PackRepository::new(state.db.clone())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::PackNotFound, format!("Pack {} not found", id))
        })?;
    Ok(Json(pack))
}

/// POST /api/packs - 创建套餐
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreatePackRequest>,
) -> AppResult<Json<Pack>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    if payload.price < Decimal::ZERO {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "price must be >= 0",
        ));
    }
    if let Some(components) = &payload.components {
        verify_components(&state, components).await?;
    }

    let created = PackRepository::new(state.db.clone())
        .create(PackCreate {
            name: payload.name,
            price: payload.price,
            components: payload.components,
        })
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::PackNameExists, msg),
            other => other.into(),
        })?;
    Ok(Json(created))
}

/// PUT /api/packs/:id - 更新套餐
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<PackUpdate>,
) -> AppResult<Json<Pack>> {
    if let Some(price) = payload.price
        && price < Decimal::ZERO
    {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "price must be >= 0",
        ));
    }

    let updated = PackRepository::new(state.db.clone())
        .update(&id, payload)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::PackNameExists, msg),
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::PackNotFound, msg),
            other => other.into(),
        })?;
    Ok(Json(updated))
}

/// PUT /api/packs/:id/components - 追加组件槽位 (列表只增不减)
pub async fn add_components(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<AddComponentsRequest>,
) -> AppResult<Json<Pack>> {
    if payload.components.is_empty() {
        return Err(AppError::validation("components must not be empty"));
    }
    verify_components(&state, &payload.components).await?;

    let updated = PackRepository::new(state.db.clone())
        .add_components(&id, payload.components)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::PackNotFound, msg),
            other => other.into(),
        })?;
    Ok(Json(updated))
}

async fn verify_components(state: &ServerState, components: &[PackComponent]) -> AppResult<()> {
    let repo = ComponentRepository::new(state.db.clone());
    for pc in components {
        if repo.find_by_id(&pc.component_id).await?.is_none() {
            return Err(AppError::with_message(
                ErrorCode::ComponentNotFound,
                format!("Component {} not found", pc.component_id),
            ));
        }
    }
    Ok(())
}
