//! SeaORM entities for ideation tables

pub mod brainstorm_session;
pub mod diagram;
