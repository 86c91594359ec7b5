/// Change events for the planner service
///
/// Emitted after a write is committed so connected clients of the team's
/// room can refresh. The server forwards them to the realtime hub.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Created,
    Updated,
    Moved,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "entity", rename_all = "snake_case")]
pub enum PlannerEvent {
    Task {
        team_id: Uuid,
        task_id: Uuid,
        change: ChangeKind,
        actor_id: Uuid,
        timestamp: DateTime<Utc>,
    },
    Sprint {
        team_id: Uuid,
        sprint_id: Uuid,
        change: ChangeKind,
        actor_id: Uuid,
        timestamp: DateTime<Utc>,
    },
    CalendarEvent {
        team_id: Uuid,
        event_id: Uuid,
        change: ChangeKind,
        actor_id: Uuid,
        timestamp: DateTime<Utc>,
    },
    Note {
        team_id: Uuid,
        note_id: Uuid,
        change: ChangeKind,
        actor_id: Uuid,
        timestamp: DateTime<Utc>,
    },
    /// A notification was stored for `user_id`
    Notification {
        user_id: Uuid,
        notification_id: Uuid,
        timestamp: DateTime<Utc>,
    },
}

impl PlannerEvent {
    /// Realtime room the event belongs to
    pub fn room(&self) -> String {
        match self {
            PlannerEvent::Task { team_id, .. }
            | PlannerEvent::Sprint { team_id, .. }
            | PlannerEvent::CalendarEvent { team_id, .. }
            | PlannerEvent::Note { team_id, .. } => format!("team:{}", team_id),
            PlannerEvent::Notification { user_id, .. } => format!("user:{}", user_id),
        }
    }

    /// Event name, e.g. `task.moved`
    pub fn name(&self) -> String {
        let (entity, change) = match self {
            PlannerEvent::Task { change, .. } => ("task", *change),
            PlannerEvent::Sprint { change, .. } => ("sprint", *change),
            PlannerEvent::CalendarEvent { change, .. } => ("calendar_event", *change),
            PlannerEvent::Note { change, .. } => ("note", *change),
            PlannerEvent::Notification { .. } => return "notification.created".to_string(),
        };
        let change = match change {
            ChangeKind::Created => "created",
            ChangeKind::Updated => "updated",
            ChangeKind::Moved => "moved",
            ChangeKind::Deleted => "deleted",
        };
        format!("{}.{}", entity, change)
    }
}

/// Sink for planner change events
#[async_trait::async_trait]
pub trait PlannerEventSink: Send + Sync {
    async fn publish(&self, event: PlannerEvent) -> anyhow::Result<()>;
}

/// No-op sink for tests or when realtime is disabled
pub struct NoOpPlannerEventSink;

#[async_trait::async_trait]
impl PlannerEventSink for NoOpPlannerEventSink {
    async fn publish(&self, _event: PlannerEvent) -> anyhow::Result<()> {
        Ok(())
    }
}
