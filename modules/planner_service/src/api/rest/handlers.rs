//! HTTP request handlers - thin layer that delegates to domain service

use super::dto::*;
use super::error::map_domain_error;
use super::mapper::{parse_priority, parse_status};
use crate::contract::{
    EventPatch, NewEvent, NewNote, NewSprint, NewTask, NoteFilter, NotePatch, SprintPatch,
    TaskFilter, TaskPatch,
};
use crate::domain::Service;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Extension, Json,
};
use brainforge_kit::{PageQuery, Problem, SecurityCtx};
use std::sync::Arc;
use uuid::Uuid;

// ===== Task Handlers =====

pub async fn create_task(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(team_id): Path<Uuid>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskDto>), Problem> {
    let new_task = NewTask {
        title: req.title,
        description: req.description,
        status: req.status.as_deref().map(parse_status).transpose()?,
        priority: req.priority.as_deref().map(parse_priority).transpose()?,
        assignee_id: req.assignee_id,
        sprint_id: req.sprint_id,
        due_date: req.due_date,
        tags: req.tags,
    };
    let task = service
        .create_task(&ctx, team_id, new_task)
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(task.into())))
}

pub async fn list_tasks(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(team_id): Path<Uuid>,
    Query(query): Query<TaskListQuery>,
) -> Result<Json<Vec<TaskDto>>, Problem> {
    let filter = TaskFilter {
        status: query.status.as_deref().map(parse_status).transpose()?,
        assignee_id: query.assignee_id,
        sprint_id: query.sprint_id,
        search: query.search,
    };
    let tasks = service
        .list_tasks(&ctx, team_id, filter)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(tasks.into_iter().map(TaskDto::from).collect()))
}

pub async fn board(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(team_id): Path<Uuid>,
) -> Result<Json<BoardDto>, Problem> {
    let columns = service.board(&ctx, team_id).await.map_err(map_domain_error)?;

    Ok(Json(BoardDto {
        team_id,
        columns: columns.into_iter().map(BoardColumnDto::from).collect(),
    }))
}

pub async fn backlog(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(team_id): Path<Uuid>,
) -> Result<Json<Vec<TaskDto>>, Problem> {
    let tasks = service.backlog(&ctx, team_id).await.map_err(map_domain_error)?;
    Ok(Json(tasks.into_iter().map(TaskDto::from).collect()))
}

pub async fn get_task(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(task_id): Path<Uuid>,
) -> Result<Json<TaskDto>, Problem> {
    let task = service.get_task(&ctx, task_id).await.map_err(map_domain_error)?;
    Ok(Json(task.into()))
}

pub async fn update_task(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(task_id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<TaskDto>, Problem> {
    let patch = TaskPatch {
        title: req.title,
        description: req.description,
        status: req.status.as_deref().map(parse_status).transpose()?,
        priority: req.priority.as_deref().map(parse_priority).transpose()?,
        assignee_id: req.assignee_id,
        sprint_id: req.sprint_id,
        due_date: req.due_date,
        tags: req.tags,
    };
    let task = service
        .update_task(&ctx, task_id, patch)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(task.into()))
}

pub async fn move_task(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(task_id): Path<Uuid>,
    Json(req): Json<MoveTaskRequest>,
) -> Result<Json<TaskDto>, Problem> {
    let status = parse_status(&req.status)?;
    let task = service
        .move_task(&ctx, task_id, status, req.position)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(task.into()))
}

pub async fn delete_task(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(task_id): Path<Uuid>,
) -> Result<StatusCode, Problem> {
    service.delete_task(&ctx, task_id).await.map_err(map_domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== Sprint Handlers =====

pub async fn create_sprint(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(team_id): Path<Uuid>,
    Json(req): Json<CreateSprintRequest>,
) -> Result<(StatusCode, Json<SprintDto>), Problem> {
    let new_sprint = NewSprint {
        name: req.name,
        goal: req.goal,
        start_date: req.start_date,
        end_date: req.end_date,
    };
    let sprint = service
        .create_sprint(&ctx, team_id, new_sprint)
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(sprint.into())))
}

pub async fn list_sprints(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(team_id): Path<Uuid>,
) -> Result<Json<Vec<SprintDto>>, Problem> {
    let sprints = service.list_sprints(&ctx, team_id).await.map_err(map_domain_error)?;
    Ok(Json(sprints.into_iter().map(SprintDto::from).collect()))
}

pub async fn get_sprint(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(sprint_id): Path<Uuid>,
) -> Result<Json<SprintDto>, Problem> {
    let sprint = service.get_sprint(&ctx, sprint_id).await.map_err(map_domain_error)?;
    Ok(Json(sprint.into()))
}

pub async fn update_sprint(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(sprint_id): Path<Uuid>,
    Json(req): Json<UpdateSprintRequest>,
) -> Result<Json<SprintDto>, Problem> {
    let patch = SprintPatch {
        name: req.name,
        goal: req.goal,
        start_date: req.start_date,
        end_date: req.end_date,
    };
    let sprint = service
        .update_sprint(&ctx, sprint_id, patch)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(sprint.into()))
}

pub async fn delete_sprint(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(sprint_id): Path<Uuid>,
) -> Result<StatusCode, Problem> {
    service.delete_sprint(&ctx, sprint_id).await.map_err(map_domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn assign_tasks(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(sprint_id): Path<Uuid>,
    Json(req): Json<AssignTasksRequest>,
) -> Result<Json<Vec<TaskDto>>, Problem> {
    let tasks = service
        .assign_tasks(&ctx, sprint_id, req.task_ids)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(tasks.into_iter().map(TaskDto::from).collect()))
}

pub async fn start_sprint(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(sprint_id): Path<Uuid>,
) -> Result<Json<SprintDto>, Problem> {
    let sprint = service.start_sprint(&ctx, sprint_id).await.map_err(map_domain_error)?;
    Ok(Json(sprint.into()))
}

pub async fn complete_sprint(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(sprint_id): Path<Uuid>,
) -> Result<Json<SprintDto>, Problem> {
    let sprint = service
        .complete_sprint(&ctx, sprint_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(sprint.into()))
}

pub async fn sprint_summary(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(sprint_id): Path<Uuid>,
) -> Result<Json<SprintSummaryDto>, Problem> {
    let summary = service
        .sprint_summary(&ctx, sprint_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(summary.into()))
}

// ===== Calendar Handlers =====

pub async fn create_event(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(team_id): Path<Uuid>,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventDto>), Problem> {
    let new_event = NewEvent {
        title: req.title,
        description: req.description,
        starts_at: req.starts_at,
        ends_at: req.ends_at,
        all_day: req.all_day,
        location: req.location,
        attendee_ids: req.attendee_ids,
        task_id: req.task_id,
    };
    let event = service
        .create_event(&ctx, team_id, new_event)
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(event.into())))
}

pub async fn list_events(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(team_id): Path<Uuid>,
    Query(window): Query<EventWindowQuery>,
) -> Result<Json<Vec<EventDto>>, Problem> {
    let events = service
        .list_events(&ctx, team_id, window.from, window.to)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(events.into_iter().map(EventDto::from).collect()))
}

pub async fn get_event(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EventDto>, Problem> {
    let event = service.get_event(&ctx, event_id).await.map_err(map_domain_error)?;
    Ok(Json(event.into()))
}

pub async fn update_event(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(event_id): Path<Uuid>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Json<EventDto>, Problem> {
    let patch = EventPatch {
        title: req.title,
        description: req.description,
        starts_at: req.starts_at,
        ends_at: req.ends_at,
        all_day: req.all_day,
        location: req.location,
        attendee_ids: req.attendee_ids,
        task_id: req.task_id,
    };
    let event = service
        .update_event(&ctx, event_id, patch)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(event.into()))
}

pub async fn delete_event(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(event_id): Path<Uuid>,
) -> Result<StatusCode, Problem> {
    service.delete_event(&ctx, event_id).await.map_err(map_domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== Note Handlers =====

pub async fn create_note(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(team_id): Path<Uuid>,
    Json(req): Json<CreateNoteRequest>,
) -> Result<(StatusCode, Json<NoteDto>), Problem> {
    let new_note = NewNote {
        title: req.title,
        content: req.content,
        pinned: req.pinned,
        tags: req.tags,
    };
    let note = service
        .create_note(&ctx, team_id, new_note)
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(note.into())))
}

pub async fn list_notes(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(team_id): Path<Uuid>,
    Query(query): Query<NoteListQuery>,
) -> Result<Json<Vec<NoteDto>>, Problem> {
    let filter = NoteFilter {
        search: query.search,
        tag: query.tag,
    };
    let notes = service
        .list_notes(&ctx, team_id, filter)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(notes.into_iter().map(NoteDto::from).collect()))
}

pub async fn get_note(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(note_id): Path<Uuid>,
) -> Result<Json<NoteDto>, Problem> {
    let note = service.get_note(&ctx, note_id).await.map_err(map_domain_error)?;
    Ok(Json(note.into()))
}

pub async fn update_note(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(note_id): Path<Uuid>,
    Json(req): Json<UpdateNoteRequest>,
) -> Result<Json<NoteDto>, Problem> {
    let patch = NotePatch {
        title: req.title,
        content: req.content,
        pinned: req.pinned,
        tags: req.tags,
    };
    let note = service
        .update_note(&ctx, note_id, patch)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(note.into()))
}

pub async fn delete_note(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(note_id): Path<Uuid>,
) -> Result<StatusCode, Problem> {
    service.delete_note(&ctx, note_id).await.map_err(map_domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== Notification Handlers =====

pub async fn list_notifications(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Query(query): Query<NotificationListQuery>,
) -> Result<Json<NotificationsListResponse>, Problem> {
    let page = PageQuery {
        limit: query.limit,
        offset: query.offset,
    };
    let page = service
        .list_notifications(&ctx, query.unread_only, page)
        .await
        .map_err(map_domain_error)?
        .map(NotificationDto::from);

    Ok(Json(NotificationsListResponse {
        items: page.items,
        total: page.total,
        limit: page.limit,
        offset: page.offset,
    }))
}

pub async fn unread_count(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
) -> Result<Json<CountResponse>, Problem> {
    let count = service.unread_count(&ctx).await.map_err(map_domain_error)?;
    Ok(Json(CountResponse { count }))
}

pub async fn mark_read(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(notification_id): Path<Uuid>,
) -> Result<Json<NotificationDto>, Problem> {
    let notification = service
        .mark_read(&ctx, notification_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(notification.into()))
}

pub async fn mark_all_read(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
) -> Result<Json<CountResponse>, Problem> {
    let count = service.mark_all_read(&ctx).await.map_err(map_domain_error)?;
    Ok(Json(CountResponse { count }))
}

pub async fn delete_notification(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(notification_id): Path<Uuid>,
) -> Result<StatusCode, Problem> {
    service
        .delete_notification(&ctx, notification_id)
        .await
        .map_err(map_domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}
