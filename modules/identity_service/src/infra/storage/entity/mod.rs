//! SeaORM entities for identity tables

pub mod invitation;
pub mod team;
pub mod team_member;
pub mod user;
