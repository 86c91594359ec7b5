//! Native client trait for inter-module communication

use super::model::{PresenceEntry, Room};

/// In-process access to the hub for event bridges
pub trait RealtimeApi: Send + Sync {
    /// Fan an event out to the room; returns how many subscribers got it
    fn publish(&self, room: Room, event: &str, payload: serde_json::Value) -> usize;

    /// Current presence of a room, oldest member first
    fn members(&self, room: Room) -> Vec<PresenceEntry>;
}
