//! SeaORM storage for sessions and diagrams

pub mod entity;
pub mod mapper;
pub mod migrations;
pub mod repositories;
