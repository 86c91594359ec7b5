//! Infrastructure layer - vendor adapters and storage

pub mod providers;
pub mod storage;
