//! API layer - REST and SSE handlers plus the native in-process client

pub mod native;
pub mod rest;
