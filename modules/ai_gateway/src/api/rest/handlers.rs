//! HTTP request handlers - thin layer that delegates to domain service

use super::dto::*;
use super::error::map_domain_error;
use super::mapper::parse_provider;
use crate::contract::{ChatMessage, ChatRequest, NewAiKey};
use crate::domain::Service;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Extension, Json,
};
use brainforge_kit::{PageQuery, Problem, SecurityCtx};
use std::sync::Arc;

const DEFAULT_FEATURE: &str = "chat";

// ===== Providers & Chat =====

pub async fn list_providers(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
) -> Result<Json<Vec<ProviderInfoDto>>, Problem> {
    let providers = service.list_providers(&ctx).await.map_err(map_domain_error)?;
    Ok(Json(providers.into_iter().map(ProviderInfoDto::from).collect()))
}

pub async fn chat(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Json(req): Json<ChatRequestDto>,
) -> Result<Json<ChatCompletionDto>, Problem> {
    let provider = req.provider.as_deref().map(parse_provider).transpose()?;
    let messages = req
        .messages
        .into_iter()
        .map(ChatMessage::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    let request = ChatRequest {
        model: req.model,
        messages,
        temperature: req.temperature,
        max_tokens: req.max_tokens,
    };
    let feature = req.feature.as_deref().unwrap_or(DEFAULT_FEATURE);

    let completion = service
        .chat(ctx.user_id, feature, provider, request)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(completion.into()))
}

// ===== Keys =====

pub async fn list_keys(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
) -> Result<Json<Vec<AiKeyDto>>, Problem> {
    let keys = service.list_keys(&ctx).await.map_err(map_domain_error)?;
    Ok(Json(keys.into_iter().map(AiKeyDto::from).collect()))
}

pub async fn save_key(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(provider): Path<String>,
    Json(req): Json<SaveKeyRequest>,
) -> Result<Json<AiKeyDto>, Problem> {
    let input = NewAiKey {
        provider: parse_provider(&provider)?,
        api_key: req.api_key,
        label: req.label,
        endpoint: req.endpoint,
        validate: req.validate,
    };
    let key = service.save_key(&ctx, input).await.map_err(map_domain_error)?;
    Ok(Json(key.into()))
}

pub async fn delete_key(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(provider): Path<String>,
) -> Result<StatusCode, Problem> {
    service
        .delete_key(&ctx, parse_provider(&provider)?)
        .await
        .map_err(map_domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn validate_key(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(provider): Path<String>,
) -> Result<Json<AiKeyDto>, Problem> {
    let key = service
        .validate_key(&ctx, parse_provider(&provider)?)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(key.into()))
}

pub async fn set_default_provider(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(provider): Path<String>,
) -> Result<Json<AiKeyDto>, Problem> {
    let key = service
        .set_default_provider(&ctx, parse_provider(&provider)?)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(key.into()))
}

// ===== Usage =====

pub async fn list_usage(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Query(query): Query<UsageListQuery>,
) -> Result<Json<UsageListResponse>, Problem> {
    let page = PageQuery {
        limit: query.limit,
        offset: query.offset,
    };
    let page = service
        .list_usage(&ctx, page)
        .await
        .map_err(map_domain_error)?
        .map(UsageRecordDto::from);

    Ok(Json(UsageListResponse {
        items: page.items,
        total: page.total,
        limit: page.limit,
        offset: page.offset,
    }))
}

pub async fn usage_summary(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Query(range): Query<UsageRangeQuery>,
) -> Result<Json<UsageSummaryDto>, Problem> {
    let summary = service
        .usage_summary(&ctx, range.from, range.to)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(summary.into()))
}

pub async fn global_usage_summary(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Query(range): Query<UsageRangeQuery>,
) -> Result<Json<UsageSummaryDto>, Problem> {
    let summary = service
        .global_usage_summary(&ctx, range.from, range.to)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(summary.into()))
}
