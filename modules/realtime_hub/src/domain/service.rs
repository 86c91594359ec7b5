//! Domain service - presence and fan-out
//!
//! Every event goes through one broadcast channel; subscribers keep the
//! events of the room they follow. A subscriber that falls more than
//! `channel_capacity` events behind skips the missed ones.

use super::authorizer::RoomAuthorizer;
use super::presence::PresenceRegistry;
use crate::config::Config;
use crate::contract::{PresenceAction, PresenceEntry, RealtimeError, Room, RoomEvent};
use brainforge_kit::SecurityCtx;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};
use uuid::Uuid;

/// Event name of join/leave/expiry notices
pub const PRESENCE_EVENT: &str = "presence";

pub struct Service {
    presence: PresenceRegistry,
    tx: broadcast::Sender<RoomEvent>,
    authorizer: Arc<dyn RoomAuthorizer>,
    config: Config,
    closed: CancellationToken,
}

impl Service {
    pub fn new(authorizer: Arc<dyn RoomAuthorizer>, config: Config) -> Self {
        let (tx, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            presence: PresenceRegistry::new(),
            tx,
            authorizer,
            config,
            closed: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// End every open event stream; used on server shutdown
    pub fn close(&self) {
        tracing::info!("closing realtime streams");
        self.closed.cancel();
    }

    /// Resolves once `close` has been called
    pub fn closed(&self) -> WaitForCancellationFutureOwned {
        self.closed.clone().cancelled_owned()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RoomEvent> {
        self.tx.subscribe()
    }

    /// Returns the number of subscribers reached; zero when nobody listens
    pub fn publish(&self, room: Room, event: &str, payload: Value) -> usize {
        let message = RoomEvent {
            room,
            event: event.to_string(),
            payload,
            sent_at: Utc::now(),
        };
        match self.tx.send(message) {
            Ok(receivers) => {
                tracing::debug!(room = %room, event, receivers, "room event published");
                receivers
            }
            Err(_) => 0,
        }
    }

    /// Parse the room and check the caller may follow it.
    ///
    /// `user:<id>` rooms are private to that user; other rooms are
    /// decided by the authorizer.
    pub async fn authorize(&self, ctx: &SecurityCtx, room: &str) -> Result<Room, RealtimeError> {
        let room = parse_room(room)?;
        match room {
            Room::User(owner) if owner != ctx.user_id => {
                return Err(RealtimeError::forbidden("this is another user's private room"));
            }
            Room::User(_) => {}
            _ => self.authorizer.authorize(room, ctx.user_id).await?,
        }
        Ok(room)
    }

    /// Join (or refresh) the caller's presence; returns the room's members
    pub async fn join(&self, ctx: &SecurityCtx, room: &str) -> Result<(Room, Vec<PresenceEntry>), RealtimeError> {
        let room = self.authorize(ctx, room).await?;
        let display_name = self
            .authorizer
            .display_name(ctx.user_id)
            .await
            .unwrap_or_else(|| ctx.email.clone());

        if self.presence.join(room, ctx.user_id, display_name, Utc::now()) {
            tracing::info!(room = %room, user_id = %ctx.user_id, "joined room");
            self.publish_presence(room, PresenceAction::Joined, ctx.user_id);
        }
        Ok((room, self.presence.members(room)))
    }

    /// Join for the lifetime of an event stream.
    ///
    /// The member stays present, whatever `presence_ttl` says, until the
    /// matching `close_stream`.
    pub async fn open_stream(&self, ctx: &SecurityCtx, room: &str) -> Result<Room, RealtimeError> {
        let (room, _) = self.join(ctx, room).await?;
        let open = self.presence.attach_stream(room, ctx.user_id);
        tracing::debug!(room = %room, user_id = %ctx.user_id, open, "event stream opened");
        Ok(room)
    }

    /// Leaves the room when the member's last stream closes; true when they left
    pub fn close_stream(&self, room: Room, user_id: Uuid) -> bool {
        match self.presence.detach_stream(room, user_id) {
            0 => self.remove_member(room, user_id),
            open => {
                tracing::debug!(room = %room, user_id = %user_id, open, "event stream closed");
                false
            }
        }
    }

    /// Keep the caller's presence alive; they must have joined first
    pub async fn heartbeat(&self, ctx: &SecurityCtx, room: &str) -> Result<PresenceEntry, RealtimeError> {
        let room = parse_room(room)?;
        self.presence
            .touch(room, ctx.user_id, Utc::now())
            .ok_or_else(|| RealtimeError::not_found("presence", room))
    }

    /// Leaving a room the caller is not in is a no-op
    pub async fn leave(&self, ctx: &SecurityCtx, room: &str) -> Result<(), RealtimeError> {
        let room = parse_room(room)?;
        self.remove_member(room, ctx.user_id);
        Ok(())
    }

    pub async fn members(&self, ctx: &SecurityCtx, room: &str) -> Result<Vec<PresenceEntry>, RealtimeError> {
        let room = self.authorize(ctx, room).await?;
        Ok(self.presence.members(room))
    }

    /// Members without an access check, for in-process callers
    pub fn room_members(&self, room: Room) -> Vec<PresenceEntry> {
        self.presence.members(room)
    }

    /// Drop a member and tell the room; false when they were not present
    pub fn remove_member(&self, room: Room, user_id: Uuid) -> bool {
        match self.presence.leave(room, user_id) {
            Some(entry) => {
                tracing::info!(room = %room, user_id = %user_id, "left room");
                self.broadcast_presence(room, PresenceAction::Left, &entry);
                true
            }
            None => false,
        }
    }

    /// Expire presence not refreshed within `presence_ttl`; returns how many were dropped
    pub fn prune_expired(&self, now: DateTime<Utc>) -> usize {
        let ttl = chrono::Duration::from_std(self.config.presence_ttl).unwrap_or_else(|_| chrono::Duration::days(1));
        let removed = self.presence.remove_stale(now - ttl);
        for (room, entry) in &removed {
            self.broadcast_presence(*room, PresenceAction::Expired, entry);
        }
        if !removed.is_empty() {
            tracing::info!(expired = removed.len(), "pruned stale presence");
        }
        removed.len()
    }

    // ===== Helpers =====

    fn publish_presence(&self, room: Room, action: PresenceAction, user_id: Uuid) {
        if let Some(entry) = self.presence.members(room).into_iter().find(|e| e.user_id == user_id) {
            self.broadcast_presence(room, action, &entry);
        }
    }

    fn broadcast_presence(&self, room: Room, action: PresenceAction, entry: &PresenceEntry) {
        let members: Vec<Value> = self.presence.members(room).iter().map(presence_json).collect();
        let payload = json!({
            "action": action.as_str(),
            "user_id": entry.user_id,
            "display_name": entry.display_name,
            "members": members,
        });
        self.publish(room, PRESENCE_EVENT, payload);
    }
}

fn parse_room(room: &str) -> Result<Room, RealtimeError> {
    Room::parse(room).ok_or_else(|| RealtimeError::invalid_room(room))
}

pub fn presence_json(entry: &PresenceEntry) -> Value {
    json!({
        "user_id": entry.user_id,
        "display_name": entry.display_name,
        "joined_at": entry.joined_at,
        "last_seen": entry.last_seen,
    })
}
