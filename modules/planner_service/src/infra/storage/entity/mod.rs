//! SeaORM entities for planner tables

pub mod calendar_event;
pub mod note;
pub mod notification;
pub mod sprint;
pub mod task;
