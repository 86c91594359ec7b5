//! Infrastructure layer - storage

pub mod storage;
