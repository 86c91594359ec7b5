//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{PresenceEntry, RealtimeApi, Room};
use crate::domain::Service;
use std::sync::Arc;

/// Handed to the planner, ideation and identity event bridges
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

impl RealtimeApi for NativeClient {
    fn publish(&self, room: Room, event: &str, payload: serde_json::Value) -> usize {
        self.service.publish(room, event, payload)
    }

    fn members(&self, room: Room) -> Vec<PresenceEntry> {
        self.service.room_members(room)
    }
}
