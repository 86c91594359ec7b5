use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

/// A broadcast room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Room {
    /// Everything happening in a team
    Team(Uuid),
    /// A team's task board
    Board(Uuid),
    /// One brainstorm session
    Session(Uuid),
    /// Private feed of one user
    User(Uuid),
}

impl Room {
    /// Parse `kind:<uuid>`
    pub fn parse(s: &str) -> Option<Self> {
        let (kind, id) = s.split_once(':')?;
        let id = Uuid::parse_str(id).ok()?;
        match kind {
            "team" => Some(Room::Team(id)),
            "board" => Some(Room::Board(id)),
            "session" => Some(Room::Session(id)),
            "user" => Some(Room::User(id)),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Room::Team(_) => "team",
            Room::Board(_) => "board",
            Room::Session(_) => "session",
            Room::User(_) => "user",
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Room::Team(id) | Room::Board(id) | Room::Session(id) | Room::User(id) => *id,
        }
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id())
    }
}

/// Who is in a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceEntry {
    pub user_id: Uuid,
    pub display_name: String,
    pub joined_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceAction {
    Joined,
    Left,
    /// Dropped after missing heartbeats
    Expired,
}

impl PresenceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PresenceAction::Joined => "joined",
            PresenceAction::Left => "left",
            PresenceAction::Expired => "expired",
        }
    }
}

/// One message fanned out to a room's subscribers
#[derive(Debug, Clone, PartialEq)]
pub struct RoomEvent {
    pub room: Room,
    /// Event name, e.g. `task.moved` or `presence`
    pub event: String,
    pub payload: serde_json::Value,
    pub sent_at: DateTime<Utc>,
}
