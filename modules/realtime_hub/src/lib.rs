//! Realtime Hub Module
//!
//! Room presence and event fan-out for the web client. Rooms are
//! `team:<id>`, `board:<id>`, `session:<id>` and `user:<id>`; clients
//! follow a room over server-sent events and keep their presence alive
//! with heartbeats.

// Public exports
pub mod contract;
pub use contract::{
    client::RealtimeApi, error::RealtimeError, PresenceAction, PresenceEntry, Room, RoomEvent,
};

pub mod module;
pub use module::RealtimeModule;

pub use domain::{RoomAuthorizer, PRESENCE_EVENT};

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
