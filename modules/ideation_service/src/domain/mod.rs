//! Domain layer - business logic and services

pub mod events;
pub mod mermaid;
pub mod prompts;
pub mod repository;
pub mod service;
pub mod validation;

pub use events::{ChangeKind, IdeationEvent, IdeationEventSink, NoOpIdeationEventSink};
pub use repository::{DiagramRepository, SessionRepository};
pub use service::Service;
