//! Room access checks
//!
//! The hub does not know who belongs to a team or which team owns a
//! session; the server supplies an implementation backed by identity and
//! ideation.

use crate::contract::{RealtimeError, Room};
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait RoomAuthorizer: Send + Sync {
    /// Ok when `user_id` may follow `room`
    async fn authorize(&self, room: Room, user_id: Uuid) -> Result<(), RealtimeError>;

    /// Name shown in presence lists; `None` falls back to the caller's email
    async fn display_name(&self, user_id: Uuid) -> Option<String> {
        let _ = user_id;
        None
    }
}
