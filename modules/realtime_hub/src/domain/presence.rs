//! Room presence map

use crate::contract::{PresenceEntry, Room};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use uuid::Uuid;

/// `room -> user -> entry`; rooms disappear with their last member.
///
/// Open event streams are counted per member. A member with a stream open
/// never goes stale.
#[derive(Default)]
pub struct PresenceRegistry {
    rooms: DashMap<Room, HashMap<Uuid, PresenceEntry>>,
    streams: DashMap<(Room, Uuid), usize>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or refresh a member; returns true when the user was not present.
    /// A rejoin keeps the original `joined_at`.
    pub fn join(&self, room: Room, user_id: Uuid, display_name: String, now: DateTime<Utc>) -> bool {
        let mut members = self.rooms.entry(room).or_default();
        let joined = match members.entry(user_id) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                entry.display_name = display_name;
                entry.last_seen = now;
                false
            }
            Entry::Vacant(vacant) => {
                vacant.insert(PresenceEntry {
                    user_id,
                    display_name,
                    joined_at: now,
                    last_seen: now,
                });
                true
            }
        };
        joined
    }

    /// Refresh `last_seen`; `None` when the user is not in the room
    pub fn touch(&self, room: Room, user_id: Uuid, now: DateTime<Utc>) -> Option<PresenceEntry> {
        let mut members = self.rooms.get_mut(&room)?;
        let entry = members.get_mut(&user_id)?;
        entry.last_seen = now;
        Some(entry.clone())
    }

    /// Count one more open stream; returns the new count
    pub fn attach_stream(&self, room: Room, user_id: Uuid) -> usize {
        let mut count = self.streams.entry((room, user_id)).or_default();
        *count += 1;
        *count
    }

    /// Count one stream closed; returns how many remain open
    pub fn detach_stream(&self, room: Room, user_id: Uuid) -> usize {
        let key = (room, user_id);
        let remaining = match self.streams.get_mut(&key) {
            Some(mut count) => {
                *count = count.saturating_sub(1);
                *count
            }
            None => 0,
        };
        self.streams.remove_if(&key, |_, count| *count == 0);
        remaining
    }

    pub fn leave(&self, room: Room, user_id: Uuid) -> Option<PresenceEntry> {
        let removed = self
            .rooms
            .get_mut(&room)
            .and_then(|mut members| members.remove(&user_id));
        self.rooms.remove_if(&room, |_, members| members.is_empty());
        removed
    }

    /// Members ordered by join time
    pub fn members(&self, room: Room) -> Vec<PresenceEntry> {
        let mut members: Vec<PresenceEntry> = self
            .rooms
            .get(&room)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default();
        members.sort_by(|a, b| a.joined_at.cmp(&b.joined_at).then(a.user_id.cmp(&b.user_id)));
        members
    }

    /// Remove entries not seen since `cutoff` that have no open stream
    pub fn remove_stale(&self, cutoff: DateTime<Utc>) -> Vec<(Room, PresenceEntry)> {
        let mut removed = Vec::new();
        for mut room in self.rooms.iter_mut() {
            let key = *room.key();
            room.value_mut().retain(|user_id, entry| {
                if entry.last_seen < cutoff && !self.streams.contains_key(&(key, *user_id)) {
                    removed.push((key, entry.clone()));
                    false
                } else {
                    true
                }
            });
        }
        self.rooms.retain(|_, members| !members.is_empty());
        removed
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
