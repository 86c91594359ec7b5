//! Domain layer - business logic and services

pub mod events;
pub mod password;
pub mod repository;
pub mod service;
pub mod validation;

pub use events::{IdentityEvent, IdentityEventPublisher, NoOpIdentityEventPublisher};
pub use repository::{InvitationRepository, StoredUser, TeamRepository, UserRepository};
pub use service::Service;
