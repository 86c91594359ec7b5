//! REST and SSE API layer

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
