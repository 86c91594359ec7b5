//! Domain layer - presence tracking and room fan-out

pub mod authorizer;
pub mod presence;
pub mod service;

pub use authorizer::RoomAuthorizer;
pub use presence::PresenceRegistry;
pub use service::{Service, PRESENCE_EVENT};
