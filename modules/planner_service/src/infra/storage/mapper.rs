//! Entity to model mappers
//!
//! Enums are stored as their snake_case names, tags and attendee lists as
//! JSON arrays.

use super::entity::{calendar_event, note, notification, sprint, task};
use crate::contract::{CalendarEvent, Note, Notification, SprintPlan, SprintStatus, Task, TaskPriority, TaskStatus};
use anyhow::{anyhow, Context};
use sea_orm::ActiveValue::Set;
use uuid::Uuid;

fn tags_to_json(tags: &[String]) -> serde_json::Value {
    serde_json::Value::from(tags.to_vec())
}

fn tags_from_json(value: serde_json::Value) -> anyhow::Result<Vec<String>> {
    serde_json::from_value(value).context("tags column is not a JSON array of strings")
}

// ===== Task conversions =====

impl TryFrom<task::Model> for Task {
    type Error = anyhow::Error;

    fn try_from(entity: task::Model) -> Result<Self, Self::Error> {
        let status = TaskStatus::parse(&entity.status)
            .ok_or_else(|| anyhow!("unknown task status '{}' for task {}", entity.status, entity.id))?;
        let priority = TaskPriority::parse(&entity.priority)
            .ok_or_else(|| anyhow!("unknown task priority '{}' for task {}", entity.priority, entity.id))?;

        Ok(Self {
            id: entity.id,
            team_id: entity.team_id,
            title: entity.title,
            description: entity.description,
            status,
            priority,
            assignee_id: entity.assignee_id,
            creator_id: entity.creator_id,
            sprint_id: entity.sprint_id,
            due_date: entity.due_date,
            position: entity.position,
            tags: tags_from_json(entity.tags)?,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            completed_at: entity.completed_at,
        })
    }
}

impl From<&Task> for task::ActiveModel {
    fn from(model: &Task) -> Self {
        Self {
            id: Set(model.id),
            team_id: Set(model.team_id),
            title: Set(model.title.clone()),
            description: Set(model.description.clone()),
            status: Set(model.status.as_str().to_string()),
            priority: Set(model.priority.as_str().to_string()),
            assignee_id: Set(model.assignee_id),
            creator_id: Set(model.creator_id),
            sprint_id: Set(model.sprint_id),
            due_date: Set(model.due_date),
            position: Set(model.position),
            tags: Set(tags_to_json(&model.tags)),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
            completed_at: Set(model.completed_at),
        }
    }
}

// ===== Sprint conversions =====

impl TryFrom<sprint::Model> for SprintPlan {
    type Error = anyhow::Error;

    fn try_from(entity: sprint::Model) -> Result<Self, Self::Error> {
        let status = SprintStatus::parse(&entity.status)
            .ok_or_else(|| anyhow!("unknown sprint status '{}' for sprint {}", entity.status, entity.id))?;

        Ok(Self {
            id: entity.id,
            team_id: entity.team_id,
            name: entity.name,
            goal: entity.goal,
            start_date: entity.start_date,
            end_date: entity.end_date,
            status,
            created_by: entity.created_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

impl From<&SprintPlan> for sprint::ActiveModel {
    fn from(model: &SprintPlan) -> Self {
        Self {
            id: Set(model.id),
            team_id: Set(model.team_id),
            name: Set(model.name.clone()),
            goal: Set(model.goal.clone()),
            start_date: Set(model.start_date),
            end_date: Set(model.end_date),
            status: Set(model.status.as_str().to_string()),
            created_by: Set(model.created_by),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        }
    }
}

// ===== Calendar event conversions =====

impl TryFrom<calendar_event::Model> for CalendarEvent {
    type Error = anyhow::Error;

    fn try_from(entity: calendar_event::Model) -> Result<Self, Self::Error> {
        let attendee_ids: Vec<Uuid> = serde_json::from_value(entity.attendee_ids)
            .with_context(|| format!("bad attendee list for event {}", entity.id))?;

        Ok(Self {
            id: entity.id,
            team_id: entity.team_id,
            title: entity.title,
            description: entity.description,
            starts_at: entity.starts_at,
            ends_at: entity.ends_at,
            all_day: entity.all_day,
            location: entity.location,
            created_by: entity.created_by,
            attendee_ids,
            task_id: entity.task_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

impl From<&CalendarEvent> for calendar_event::ActiveModel {
    fn from(model: &CalendarEvent) -> Self {
        let attendees = model
            .attendee_ids
            .iter()
            .map(|id| serde_json::Value::String(id.to_string()))
            .collect();

        Self {
            id: Set(model.id),
            team_id: Set(model.team_id),
            title: Set(model.title.clone()),
            description: Set(model.description.clone()),
            starts_at: Set(model.starts_at),
            ends_at: Set(model.ends_at),
            all_day: Set(model.all_day),
            location: Set(model.location.clone()),
            created_by: Set(model.created_by),
            attendee_ids: Set(serde_json::Value::Array(attendees)),
            task_id: Set(model.task_id),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        }
    }
}

// ===== Note conversions =====

impl TryFrom<note::Model> for Note {
    type Error = anyhow::Error;

    fn try_from(entity: note::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: entity.id,
            team_id: entity.team_id,
            author_id: entity.author_id,
            title: entity.title,
            content: entity.content,
            pinned: entity.pinned,
            tags: tags_from_json(entity.tags)?,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

impl From<&Note> for note::ActiveModel {
    fn from(model: &Note) -> Self {
        Self {
            id: Set(model.id),
            team_id: Set(model.team_id),
            author_id: Set(model.author_id),
            title: Set(model.title.clone()),
            content: Set(model.content.clone()),
            pinned: Set(model.pinned),
            tags: Set(tags_to_json(&model.tags)),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        }
    }
}

// ===== Notification conversions =====

impl From<notification::Model> for Notification {
    fn from(entity: notification::Model) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            kind: entity.kind,
            title: entity.title,
            body: entity.body,
            link: entity.link,
            read_at: entity.read_at,
            created_at: entity.created_at,
        }
    }
}

impl From<&Notification> for notification::ActiveModel {
    fn from(model: &Notification) -> Self {
        Self {
            id: Set(model.id),
            user_id: Set(model.user_id),
            kind: Set(model.kind.clone()),
            title: Set(model.title.clone()),
            body: Set(model.body.clone()),
            link: Set(model.link.clone()),
            read_at: Set(model.read_at),
            created_at: Set(model.created_at),
        }
    }
}
