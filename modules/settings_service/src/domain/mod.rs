//! Domain layer - business logic and repository traits

pub mod events;
pub mod repository;
pub mod service;
pub mod validation;

pub use events::{NoOpSettingsEventPublisher, SettingsEvent, SettingsEventPublisher};
pub use repository::SettingsRepository;
pub use service::Service;
