/// Change events for the ideation service
///
/// Published after a write so collaborators in the session's room see new
/// ideas and votes; the server forwards them to the realtime hub.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Created,
    Updated,
    IdeaAdded,
    IdeaRemoved,
    Voted,
    Closed,
    Deleted,
}

impl ChangeKind {
    fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Created => "created",
            ChangeKind::Updated => "updated",
            ChangeKind::IdeaAdded => "idea_added",
            ChangeKind::IdeaRemoved => "idea_removed",
            ChangeKind::Voted => "voted",
            ChangeKind::Closed => "closed",
            ChangeKind::Deleted => "deleted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "entity", rename_all = "snake_case")]
pub enum IdeationEvent {
    Session {
        team_id: Uuid,
        session_id: Uuid,
        change: ChangeKind,
        actor_id: Uuid,
        timestamp: DateTime<Utc>,
    },
    Diagram {
        team_id: Uuid,
        diagram_id: Uuid,
        change: ChangeKind,
        actor_id: Uuid,
        timestamp: DateTime<Utc>,
    },
}

impl IdeationEvent {
    /// Session events go to the session room, diagrams to the team room
    pub fn room(&self) -> String {
        match self {
            IdeationEvent::Session { session_id, .. } => format!("session:{}", session_id),
            IdeationEvent::Diagram { team_id, .. } => format!("team:{}", team_id),
        }
    }

    /// Event name, e.g. `brainstorm.voted`
    pub fn name(&self) -> String {
        match self {
            IdeationEvent::Session { change, .. } => format!("brainstorm.{}", change.as_str()),
            IdeationEvent::Diagram { change, .. } => format!("diagram.{}", change.as_str()),
        }
    }
}

/// Sink for ideation change events
#[async_trait::async_trait]
pub trait IdeationEventSink: Send + Sync {
    async fn publish(&self, event: IdeationEvent) -> anyhow::Result<()>;
}

/// No-op sink for tests or when realtime is disabled
pub struct NoOpIdeationEventSink;

#[async_trait::async_trait]
impl IdeationEventSink for NoOpIdeationEventSink {
    async fn publish(&self, _event: IdeationEvent) -> anyhow::Result<()> {
        Ok(())
    }
}
