//! HTTP request handlers - thin layer that delegates to domain service

use super::dto::*;
use super::error::map_domain_error;
use crate::domain::Service;
use axum::{extract::Path, http::StatusCode, Extension, Json};
use brainforge_kit::{Problem, SecurityCtx};
use std::sync::Arc;

/// GET /settings
pub async fn list_settings(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
) -> Result<Json<Vec<SettingDto>>, Problem> {
    let settings = service.list_settings(&ctx).await.map_err(map_domain_error)?;
    Ok(Json(settings.into_iter().map(SettingDto::from).collect()))
}

/// GET /settings/{key}
pub async fn get_setting(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(key): Path<String>,
) -> Result<Json<SettingDto>, Problem> {
    let setting = service.get_setting(&ctx, &key).await.map_err(map_domain_error)?;
    Ok(Json(setting.into()))
}

/// PUT /settings/{key}
pub async fn upsert_setting(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(key): Path<String>,
    Json(req): Json<UpsertSettingRequest>,
) -> Result<Json<SettingDto>, Problem> {
    let setting = service
        .upsert_setting(&ctx, &key, req.into())
        .await
        .map_err(map_domain_error)?;
    Ok(Json(setting.into()))
}

/// PUT /settings/{key}/lock
pub async fn lock_setting(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(key): Path<String>,
    Json(req): Json<LockSettingRequest>,
) -> Result<Json<SettingDto>, Problem> {
    let setting = service
        .lock_setting(&ctx, &key, req.locked)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(setting.into()))
}

/// DELETE /settings/{key}
pub async fn delete_setting(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(key): Path<String>,
) -> Result<StatusCode, Problem> {
    service.delete_setting(&ctx, &key).await.map_err(map_domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}
