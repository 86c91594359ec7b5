/// Domain events for the identity service
///
/// Published after the corresponding change is committed. The server wires
/// a publisher that turns them into notifications, realtime room events and
/// team data purges in other modules.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum IdentityEvent {
    /// A user joined a team (team creation or accepted invitation)
    MemberJoined {
        team_id: Uuid,
        user_id: Uuid,
        role: String,
        timestamp: DateTime<Utc>,
    },
    /// A user left or was removed from a team
    MemberRemoved {
        team_id: Uuid,
        user_id: Uuid,
        removed_by: Uuid,
        timestamp: DateTime<Utc>,
    },
    /// An invitation was issued; `invitee_id` is set when the email already has an account
    InvitationCreated {
        team_id: Uuid,
        team_name: String,
        invitation_id: Uuid,
        email: String,
        invitee_id: Option<Uuid>,
        invited_by: Uuid,
        timestamp: DateTime<Utc>,
    },
    /// A team and all its memberships were deleted
    TeamDeleted {
        team_id: Uuid,
        deleted_by: Uuid,
        timestamp: DateTime<Utc>,
    },
}

impl IdentityEvent {
    pub fn team_id(&self) -> Uuid {
        match self {
            IdentityEvent::MemberJoined { team_id, .. }
            | IdentityEvent::MemberRemoved { team_id, .. }
            | IdentityEvent::InvitationCreated { team_id, .. }
            | IdentityEvent::TeamDeleted { team_id, .. } => *team_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            IdentityEvent::MemberJoined { .. } => "member_joined",
            IdentityEvent::MemberRemoved { .. } => "member_removed",
            IdentityEvent::InvitationCreated { .. } => "invitation_created",
            IdentityEvent::TeamDeleted { .. } => "team_deleted",
        }
    }
}

/// Event publisher trait for identity events
#[async_trait::async_trait]
pub trait IdentityEventPublisher: Send + Sync {
    async fn publish(&self, event: IdentityEvent) -> anyhow::Result<()>;
}

/// No-op event publisher for testing or when events are disabled
pub struct NoOpIdentityEventPublisher;

#[async_trait::async_trait]
impl IdentityEventPublisher for NoOpIdentityEventPublisher {
    async fn publish(&self, _event: IdentityEvent) -> anyhow::Result<()> {
        Ok(())
    }
}
