//! API layer - REST handlers

pub mod rest;
