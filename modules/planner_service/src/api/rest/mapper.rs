//! Contract model to DTO conversions

use super::dto::*;
use crate::contract::{
    BoardColumn, CalendarEvent, Note, Notification, SprintPlan, SprintSummary, Task, TaskPriority,
    TaskStatus,
};
use brainforge_kit::Problem;

impl From<Task> for TaskDto {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            team_id: task.team_id,
            title: task.title,
            description: task.description,
            status: task.status.as_str().to_string(),
            priority: task.priority.as_str().to_string(),
            assignee_id: task.assignee_id,
            creator_id: task.creator_id,
            sprint_id: task.sprint_id,
            due_date: task.due_date,
            position: task.position,
            tags: task.tags,
            created_at: task.created_at,
            updated_at: task.updated_at,
            completed_at: task.completed_at,
        }
    }
}

impl From<BoardColumn> for BoardColumnDto {
    fn from(column: BoardColumn) -> Self {
        Self {
            status: column.status.as_str().to_string(),
            tasks: column.tasks.into_iter().map(TaskDto::from).collect(),
        }
    }
}

impl From<SprintPlan> for SprintDto {
    fn from(sprint: SprintPlan) -> Self {
        Self {
            id: sprint.id,
            team_id: sprint.team_id,
            name: sprint.name,
            goal: sprint.goal,
            start_date: sprint.start_date,
            end_date: sprint.end_date,
            status: sprint.status.as_str().to_string(),
            created_by: sprint.created_by,
            created_at: sprint.created_at,
            updated_at: sprint.updated_at,
        }
    }
}

impl From<SprintSummary> for SprintSummaryDto {
    fn from(summary: SprintSummary) -> Self {
        Self {
            sprint_id: summary.sprint_id,
            status: summary.status.as_str().to_string(),
            total: summary.total,
            todo: summary.todo,
            in_progress: summary.in_progress,
            review: summary.review,
            done: summary.done,
            completion_percent: summary.completion_percent,
            days_remaining: summary.days_remaining,
        }
    }
}

impl From<CalendarEvent> for EventDto {
    fn from(event: CalendarEvent) -> Self {
        Self {
            id: event.id,
            team_id: event.team_id,
            title: event.title,
            description: event.description,
            starts_at: event.starts_at,
            ends_at: event.ends_at,
            all_day: event.all_day,
            location: event.location,
            created_by: event.created_by,
            attendee_ids: event.attendee_ids,
            task_id: event.task_id,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

impl From<Note> for NoteDto {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            team_id: note.team_id,
            author_id: note.author_id,
            title: note.title,
            content: note.content,
            pinned: note.pinned,
            tags: note.tags,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

impl From<Notification> for NotificationDto {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id,
            kind: notification.kind,
            title: notification.title,
            body: notification.body,
            link: notification.link,
            read_at: notification.read_at,
            created_at: notification.created_at,
        }
    }
}

pub fn parse_status(status: &str) -> Result<TaskStatus, Problem> {
    TaskStatus::parse(status)
        .ok_or_else(|| Problem::bad_request(format!("unknown task status '{}'", status)))
}

pub fn parse_priority(priority: &str) -> Result<TaskPriority, Problem> {
    TaskPriority::parse(priority)
        .ok_or_else(|| Problem::bad_request(format!("unknown task priority '{}'", priority)))
}
