//! SeaORM entities for AI gateway tables

pub mod ai_usage_log;
pub mod user_ai_key;
