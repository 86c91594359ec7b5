//! HTTP request handlers - thin layer that delegates to domain service

use super::dto::*;
use super::error::map_domain_error;
use super::mapper::{parse_kind, parse_provider};
use crate::contract::{DiagramPatch, DiagramPrompt, NewDiagram, NewSession, SprintRequest};
use crate::domain::Service;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Extension, Json,
};
use brainforge_kit::{Problem, SecurityCtx};
use std::sync::Arc;
use uuid::Uuid;

// ===== Brainstorm Handlers =====

pub async fn create_session(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(team_id): Path<Uuid>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionDto>), Problem> {
    let session = service
        .create_session(
            &ctx,
            team_id,
            NewSession {
                title: req.title,
                topic: req.topic,
            },
        )
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(session.into())))
}

pub async fn list_sessions(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(team_id): Path<Uuid>,
) -> Result<Json<Vec<SessionDto>>, Problem> {
    let sessions = service.list_sessions(&ctx, team_id).await.map_err(map_domain_error)?;
    Ok(Json(sessions.into_iter().map(SessionDto::from).collect()))
}

pub async fn get_session(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionDto>, Problem> {
    let session = service.get_session(&ctx, session_id).await.map_err(map_domain_error)?;
    Ok(Json(session.into()))
}

pub async fn delete_session(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, Problem> {
    service
        .delete_session(&ctx, session_id)
        .await
        .map_err(map_domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_idea(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(session_id): Path<Uuid>,
    Json(req): Json<AddIdeaRequest>,
) -> Result<(StatusCode, Json<SessionDto>), Problem> {
    let session = service
        .add_idea(&ctx, session_id, &req.text)
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(session.into())))
}

pub async fn vote_idea(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path((session_id, idea_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<SessionDto>, Problem> {
    let session = service
        .vote_idea(&ctx, session_id, idea_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(session.into()))
}

pub async fn remove_idea(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path((session_id, idea_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<SessionDto>, Problem> {
    let session = service
        .remove_idea(&ctx, session_id, idea_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(session.into()))
}

pub async fn generate_ideas(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(session_id): Path<Uuid>,
    Json(req): Json<GenerateIdeasRequest>,
) -> Result<Json<SessionDto>, Problem> {
    let provider = parse_provider(req.provider.as_deref())?;
    let session = service
        .generate_ideas(&ctx, session_id, req.count, provider)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(session.into()))
}

pub async fn summarize(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(session_id): Path<Uuid>,
    Query(query): Query<ProviderQuery>,
) -> Result<Json<SessionDto>, Problem> {
    let provider = parse_provider(query.provider.as_deref())?;
    let session = service
        .summarize(&ctx, session_id, provider)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(session.into()))
}

pub async fn close_session(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionDto>, Problem> {
    let session = service.close_session(&ctx, session_id).await.map_err(map_domain_error)?;
    Ok(Json(session.into()))
}

pub async fn convert_ideas(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(session_id): Path<Uuid>,
    Json(req): Json<ConvertIdeasRequest>,
) -> Result<(StatusCode, Json<Vec<TaskDto>>), Problem> {
    let tasks = service
        .convert_to_tasks(&ctx, session_id, req.idea_ids)
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(tasks.into_iter().map(TaskDto::from).collect())))
}

// ===== Diagram Handlers =====

pub async fn create_diagram(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(team_id): Path<Uuid>,
    Json(req): Json<CreateDiagramRequest>,
) -> Result<(StatusCode, Json<DiagramDto>), Problem> {
    let new_diagram = NewDiagram {
        title: req.title,
        kind: parse_kind(&req.kind)?,
        source: req.source,
    };
    let diagram = service
        .create_diagram(&ctx, team_id, new_diagram)
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(diagram.into())))
}

pub async fn list_diagrams(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(team_id): Path<Uuid>,
) -> Result<Json<Vec<DiagramDto>>, Problem> {
    let diagrams = service.list_diagrams(&ctx, team_id).await.map_err(map_domain_error)?;
    Ok(Json(diagrams.into_iter().map(DiagramDto::from).collect()))
}

pub async fn generate_diagram(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(team_id): Path<Uuid>,
    Json(req): Json<GenerateDiagramRequest>,
) -> Result<(StatusCode, Json<DiagramDto>), Problem> {
    let input = DiagramPrompt {
        title: req.title,
        kind: parse_kind(&req.kind)?,
        prompt: req.prompt,
        provider: parse_provider(req.provider.as_deref())?,
    };
    let diagram = service
        .generate_diagram(&ctx, team_id, input)
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(diagram.into())))
}

pub async fn get_diagram(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(diagram_id): Path<Uuid>,
) -> Result<Json<DiagramDto>, Problem> {
    let diagram = service.get_diagram(&ctx, diagram_id).await.map_err(map_domain_error)?;
    Ok(Json(diagram.into()))
}

pub async fn update_diagram(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(diagram_id): Path<Uuid>,
    Json(req): Json<UpdateDiagramRequest>,
) -> Result<Json<DiagramDto>, Problem> {
    let patch = DiagramPatch {
        title: req.title,
        kind: req.kind.as_deref().map(parse_kind).transpose()?,
        source: req.source,
    };
    let diagram = service
        .update_diagram(&ctx, diagram_id, patch)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(diagram.into()))
}

pub async fn delete_diagram(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(diagram_id): Path<Uuid>,
) -> Result<StatusCode, Problem> {
    service
        .delete_diagram(&ctx, diagram_id)
        .await
        .map_err(map_domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== Sprint Planning Handlers =====

pub async fn suggest_sprint(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(team_id): Path<Uuid>,
    Json(req): Json<SprintSuggestionRequest>,
) -> Result<Json<SprintSuggestionDto>, Problem> {
    let input = SprintRequest {
        goal: req.goal,
        capacity: req.capacity,
        provider: parse_provider(req.provider.as_deref())?,
    };
    let suggestion = service
        .suggest_sprint_plan(&ctx, team_id, input)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(suggestion.into()))
}
