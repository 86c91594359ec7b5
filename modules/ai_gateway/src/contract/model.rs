//! Contract models for the AI gateway
//!
//! Pure domain models; only `ProviderKind` carries serde derives because
//! configuration names providers directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ===== Providers =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Claude,
    Gemini,
    Groq,
    OpenRouter,
    /// Azure OpenAI deployments
    Copilot,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 6] = [
        ProviderKind::OpenAi,
        ProviderKind::Claude,
        ProviderKind::Gemini,
        ProviderKind::Groq,
        ProviderKind::OpenRouter,
        ProviderKind::Copilot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Claude => "claude",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Groq => "groq",
            ProviderKind::OpenRouter => "openrouter",
            ProviderKind::Copilot => "copilot",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Some(ProviderKind::OpenAi),
            "claude" | "anthropic" => Some(ProviderKind::Claude),
            "gemini" | "google" => Some(ProviderKind::Gemini),
            "groq" => Some(ProviderKind::Groq),
            "openrouter" => Some(ProviderKind::OpenRouter),
            "copilot" | "azure" => Some(ProviderKind::Copilot),
            _ => None,
        }
    }

    /// Public API root; Copilot has none since every Azure resource has its own
    pub fn public_base_url(&self) -> Option<&'static str> {
        match self {
            ProviderKind::OpenAi => Some("https://api.openai.com/v1"),
            ProviderKind::Claude => Some("https://api.anthropic.com"),
            ProviderKind::Gemini => Some("https://generativelanguage.googleapis.com"),
            ProviderKind::Groq => Some("https://api.groq.com/openai/v1"),
            ProviderKind::OpenRouter => Some("https://openrouter.ai/api/v1"),
            ProviderKind::Copilot => None,
        }
    }

    pub fn builtin_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "gpt-4o-mini",
            ProviderKind::Claude => "claude-3-5-haiku-latest",
            ProviderKind::Gemini => "gemini-1.5-flash",
            ProviderKind::Groq => "llama-3.1-8b-instant",
            ProviderKind::OpenRouter => "openai/gpt-4o-mini",
            ProviderKind::Copilot => "gpt-4o",
        }
    }

    /// Whether keys for this provider must carry their own endpoint
    pub fn requires_endpoint(&self) -> bool {
        matches!(self, ProviderKind::Copilot)
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ===== Chat =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "system" => Some(ChatRole::System),
            "user" => Some(ChatRole::User),
            "assistant" => Some(ChatRole::Assistant),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Vendor-neutral chat completion request
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChatRequest {
    /// Provider default when unset
    pub model: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletion {
    pub provider: ProviderKind,
    pub model: String,
    pub content: String,
    pub usage: TokenUsage,
    pub finish_reason: Option<String>,
}

// ===== Keys =====

/// Stored provider key metadata; the key itself never leaves the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAiKey {
    pub id: Uuid,
    pub user_id: Uuid,
    pub provider: ProviderKind,
    /// Last four characters of the key
    pub key_hint: String,
    pub label: Option<String>,
    /// Azure resource endpoint (Copilot only)
    pub endpoint: Option<String>,
    pub is_active: bool,
    pub is_default: bool,
    pub last_validated_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for saving a key
#[derive(Clone, PartialEq, Eq)]
pub struct NewAiKey {
    pub provider: ProviderKind,
    pub api_key: String,
    pub label: Option<String>,
    pub endpoint: Option<String>,
    /// Check the key against the provider before storing it
    pub validate: bool,
}

impl std::fmt::Debug for NewAiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewAiKey")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("label", &self.label)
            .field("endpoint", &self.endpoint)
            .field("validate", &self.validate)
            .finish()
    }
}

/// Which key paid for a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    User,
    System,
}

impl KeySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeySource::User => "user",
            KeySource::System => "system",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(KeySource::User),
            "system" => Some(KeySource::System),
            _ => None,
        }
    }
}

/// Provider availability as seen by one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInfo {
    pub provider: ProviderKind,
    pub default_model: String,
    pub has_user_key: bool,
    pub has_system_key: bool,
    pub is_default: bool,
}

// ===== Usage =====

/// One metered gateway call
#[derive(Debug, Clone, PartialEq)]
pub struct UsageRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub provider: ProviderKind,
    pub model: String,
    /// Calling feature: chat, brainstorm, diagram, sprint_plan, ...
    pub feature: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    /// Estimated cost in millionths of a US dollar
    pub cost_micros: i64,
    pub key_source: KeySource,
    pub success: bool,
    pub error: Option<String>,
    pub latency_ms: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UsageTotals {
    pub requests: u64,
    pub failures: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cost_micros: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelUsage {
    pub provider: ProviderKind,
    pub model: String,
    pub totals: UsageTotals,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureUsage {
    pub feature: String,
    pub totals: UsageTotals,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageSummary {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub totals: UsageTotals,
    pub by_model: Vec<ModelUsage>,
    pub by_feature: Vec<FeatureUsage>,
}
