//! Contract model to DTO conversions

use super::dto::*;
use crate::contract::{
    ChatCompletion, ChatMessage, ChatRole, ProviderInfo, ProviderKind, UsageRecord, UsageSummary,
    UsageTotals, UserAiKey,
};
use brainforge_kit::Problem;

pub fn parse_provider(value: &str) -> Result<ProviderKind, Problem> {
    ProviderKind::parse(value).ok_or_else(|| {
        Problem::bad_request(format!(
            "unknown provider '{}'; expected one of openai, claude, gemini, groq, openrouter, copilot",
            value
        ))
    })
}

impl TryFrom<ChatMessageDto> for ChatMessage {
    type Error = Problem;

    fn try_from(dto: ChatMessageDto) -> Result<Self, Problem> {
        let role = ChatRole::parse(&dto.role)
            .ok_or_else(|| Problem::bad_request(format!("unknown message role '{}'", dto.role)))?;
        Ok(ChatMessage {
            role,
            content: dto.content,
        })
    }
}

impl From<ProviderInfo> for ProviderInfoDto {
    fn from(info: ProviderInfo) -> Self {
        Self {
            provider: info.provider.as_str().to_string(),
            default_model: info.default_model,
            has_user_key: info.has_user_key,
            has_system_key: info.has_system_key,
            is_default: info.is_default,
        }
    }
}

impl From<ChatCompletion> for ChatCompletionDto {
    fn from(completion: ChatCompletion) -> Self {
        Self {
            provider: completion.provider.as_str().to_string(),
            model: completion.model,
            content: completion.content,
            usage: TokenUsageDto {
                input_tokens: completion.usage.input_tokens,
                output_tokens: completion.usage.output_tokens,
                total_tokens: completion.usage.total(),
            },
            finish_reason: completion.finish_reason,
        }
    }
}

impl From<UserAiKey> for AiKeyDto {
    fn from(key: UserAiKey) -> Self {
        Self {
            id: key.id,
            provider: key.provider.as_str().to_string(),
            key_hint: key.key_hint,
            label: key.label,
            endpoint: key.endpoint,
            is_active: key.is_active,
            is_default: key.is_default,
            last_validated_at: key.last_validated_at,
            last_error: key.last_error,
            created_at: key.created_at,
            updated_at: key.updated_at,
        }
    }
}

impl From<UsageRecord> for UsageRecordDto {
    fn from(record: UsageRecord) -> Self {
        Self {
            id: record.id,
            provider: record.provider.as_str().to_string(),
            model: record.model,
            feature: record.feature,
            input_tokens: record.input_tokens,
            output_tokens: record.output_tokens,
            cost_micros: record.cost_micros,
            key_source: record.key_source.as_str().to_string(),
            success: record.success,
            error: record.error,
            latency_ms: record.latency_ms,
            created_at: record.created_at,
        }
    }
}

impl From<UsageTotals> for UsageTotalsDto {
    fn from(totals: UsageTotals) -> Self {
        Self {
            requests: totals.requests,
            failures: totals.failures,
            input_tokens: totals.input_tokens,
            output_tokens: totals.output_tokens,
            cost_micros: totals.cost_micros,
            cost_usd: totals.cost_micros as f64 / 1_000_000.0,
        }
    }
}

impl From<UsageSummary> for UsageSummaryDto {
    fn from(summary: UsageSummary) -> Self {
        Self {
            from: summary.from,
            to: summary.to,
            totals: summary.totals.into(),
            by_model: summary
                .by_model
                .into_iter()
                .map(|m| ModelUsageDto {
                    provider: m.provider.as_str().to_string(),
                    model: m.model,
                    totals: m.totals.into(),
                })
                .collect(),
            by_feature: summary
                .by_feature
                .into_iter()
                .map(|f| FeatureUsageDto {
                    feature: f.feature,
                    totals: f.totals.into(),
                })
                .collect(),
        }
    }
}
