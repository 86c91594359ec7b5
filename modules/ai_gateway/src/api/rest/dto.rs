//! REST DTOs with serde derives for HTTP API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// ===== Providers & Chat =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProviderInfoDto {
    #[schema(example = "openai")]
    pub provider: String,
    pub default_model: String,
    pub has_user_key: bool,
    pub has_system_key: bool,
    pub is_default: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatMessageDto {
    #[schema(example = "user")]
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ChatRequestDto {
    /// Defaults to the caller's default provider
    pub provider: Option<String>,
    /// Usage bucket; "chat" when omitted
    pub feature: Option<String>,
    pub model: Option<String>,
    pub messages: Vec<ChatMessageDto>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenUsageDto {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatCompletionDto {
    pub provider: String,
    pub model: String,
    pub content: String,
    pub usage: TokenUsageDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

// ===== Keys =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AiKeyDto {
    pub id: Uuid,
    pub provider: String,
    /// Last four characters of the key
    pub key_hint: String,
    pub label: Option<String>,
    pub endpoint: Option<String>,
    pub is_active: bool,
    pub is_default: bool,
    pub last_validated_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Deserialize, ToSchema)]
pub struct SaveKeyRequest {
    pub api_key: String,
    pub label: Option<String>,
    /// Azure resource endpoint, Copilot only
    pub endpoint: Option<String>,
    /// Try the key against the provider before storing it
    #[serde(default = "default_true")]
    pub validate: bool,
}

impl std::fmt::Debug for SaveKeyRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaveKeyRequest")
            .field("api_key", &"<redacted>")
            .field("label", &self.label)
            .field("endpoint", &self.endpoint)
            .field("validate", &self.validate)
            .finish()
    }
}

fn default_true() -> bool {
    true
}

// ===== Usage =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UsageRecordDto {
    pub id: Uuid,
    pub provider: String,
    pub model: String,
    pub feature: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub cost_micros: i64,
    #[schema(example = "user")]
    pub key_source: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub latency_ms: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UsageListQuery {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UsageListResponse {
    pub items: Vec<UsageRecordDto>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UsageRangeQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UsageTotalsDto {
    pub requests: u64,
    pub failures: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cost_micros: i64,
    /// `cost_micros` in dollars, for display
    pub cost_usd: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModelUsageDto {
    pub provider: String,
    pub model: String,
    #[serde(flatten)]
    pub totals: UsageTotalsDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeatureUsageDto {
    pub feature: String,
    #[serde(flatten)]
    pub totals: UsageTotalsDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UsageSummaryDto {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub totals: UsageTotalsDto,
    pub by_model: Vec<ModelUsageDto>,
    pub by_feature: Vec<FeatureUsageDto>,
}
