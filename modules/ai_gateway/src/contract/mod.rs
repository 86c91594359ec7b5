//! Contract layer - public API for inter-module communication

pub mod client;
pub mod error;
pub mod model;

pub use client::AiGatewayApi;
pub use error::AiGatewayError;
pub use model::{
    ChatCompletion, ChatMessage, ChatRequest, ChatRole, FeatureUsage, KeySource, ModelUsage,
    NewAiKey, ProviderInfo, ProviderKind, TokenUsage, UsageRecord, UsageSummary, UsageTotals,
    UserAiKey,
};
