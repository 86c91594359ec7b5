//! API layer - REST handlers and the native in-process client

pub mod native;
pub mod rest;
