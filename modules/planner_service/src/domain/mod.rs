//! Domain layer - business logic and services

pub mod events;
pub mod repository;
pub mod service;
pub mod validation;

pub use events::{ChangeKind, NoOpPlannerEventSink, PlannerEvent, PlannerEventSink};
pub use repository::{
    EventRepository, NoteRepository, NotificationRepository, SprintRepository, TaskRepository,
};
pub use service::{Repositories, Service};
