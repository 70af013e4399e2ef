//! Service API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Service, ServiceCreate, ServiceUpdate};
use crate::db::repository::{PackRepository, RepoError, ServiceRepository};
use crate::utils::{AppError, AppResult, ErrorCode, time};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateServiceRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub order_start_time: String,
    pub cutoff_time: String,
    pub is_published: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct AddPackRequest {
    pub pack_id: String,
}

/// GET /api/services - 餐段列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Service>>> {
    let services = ServiceRepository::new(state.db.clone()).find_all().await?;
    Ok(Json(services))
}

/// GET /api/services/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Service>> {
    let service = ServiceRepository::new(state.db.clone())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::ServiceNotFound, format!("Service {} not found", id))
        })?;
    Ok(Json(service))
}

/// POST /api/services - 创建餐段
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateServiceRequest>,
) -> AppResult<Json<Service>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    time::parse_hhmm(&payload.order_start_time)?;
    time::parse_hhmm(&payload.cutoff_time)?;

    let created = ServiceRepository::new(state.db.clone())
        .create(ServiceCreate {
            name: payload.name,
            order_start_time: payload.order_start_time,
            cutoff_time: payload.cutoff_time,
            is_published: payload.is_published,
        })
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::ServiceNameExists, msg),
            other => other.into(),
        })?;
    Ok(Json(created))
}

/// PUT /api/services/:id - 更新餐段
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ServiceUpdate>,
) -> AppResult<Json<Service>> {
    if let Some(ref start) = payload.order_start_time {
        time::parse_hhmm(start)?;
    }
    if let Some(ref cutoff) = payload.cutoff_time {
        time::parse_hhmm(cutoff)?;
    }

    let updated = ServiceRepository::new(state.db.clone())
        .update(&id, payload)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::ServiceNameExists, msg),
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::ServiceNotFound, msg),
            other => other.into(),
        })?;
    Ok(Json(updated))
}

/// PUT /api/services/:id/packs - 挂接套餐
pub async fn add_pack(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<AddPackRequest>,
) -> AppResult<Json<Service>> {
    let pack = PackRepository::new(state.db.clone())
        .find_by_id(&payload.pack_id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::PackNotFound,
                format!("Pack {} not found", payload.pack_id),
            )
        })?;
    let pack_id = pack.id.as_ref().map(|i| i.to_string()).unwrap_or_default();

    let updated = ServiceRepository::new(state.db.clone())
        .add_pack(&id, &pack_id)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::ServiceNotFound, msg),
            other => other.into(),
        })?;
    Ok(Json(updated))
}
