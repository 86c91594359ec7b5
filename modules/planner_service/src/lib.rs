//! Planner Service Module
//!
//! Team-scoped work tracking: kanban tasks, sprint plans, the team
//! calendar and notes, plus per-user notifications raised by other modules.

// Public exports
pub mod contract;
pub use contract::{
    client::{NotificationApi, PlannerApi},
    error::PlannerError,
    CalendarEvent, NewNotification, NewTask, Note, Notification, SprintPlan, SprintStatus, Task,
    TaskPriority, TaskStatus,
};

pub mod module;
pub use module::PlannerModule;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
