//! REST DTOs with serde derives for HTTP API

use crate::contract::{PresenceEntry, RoomEvent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PresenceDto {
    pub user_id: Uuid,
    pub display_name: String,
    pub joined_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoomPresenceDto {
    #[schema(example = "team:6f1c2a4e-0000-4000-8000-000000000000")]
    pub room: String,
    pub members: Vec<PresenceDto>,
}

/// Data of one SSE frame; the frame's `event` field carries the name
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoomEventDto {
    pub room: String,
    pub event: String,
    #[schema(value_type = Object)]
    pub payload: serde_json::Value,
    pub sent_at: DateTime<Utc>,
}

impl From<PresenceEntry> for PresenceDto {
    fn from(entry: PresenceEntry) -> Self {
        Self {
            user_id: entry.user_id,
            display_name: entry.display_name,
            joined_at: entry.joined_at,
            last_seen: entry.last_seen,
        }
    }
}

impl From<RoomEvent> for RoomEventDto {
    fn from(event: RoomEvent) -> Self {
        Self {
            room: event.room.to_string(),
            event: event.event,
            payload: event.payload,
            sent_at: event.sent_at,
        }
    }
}
