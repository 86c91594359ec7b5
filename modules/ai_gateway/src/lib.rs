//! AI Gateway Module
//!
//! One entry point for every chat-completion vendor BrainForge talks to.
//! Users store their own provider keys (encrypted at rest); every call is
//! metered into the usage log with token counts and an estimated cost.

// Public exports
pub mod contract;
pub use contract::{
    client::AiGatewayApi, error::AiGatewayError, ChatCompletion, ChatMessage, ChatRequest,
    ChatRole, KeySource, ProviderKind, TokenUsage, UsageRecord, UsageSummary, UserAiKey,
};

pub mod module;
pub use module::AiGatewayModule;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
