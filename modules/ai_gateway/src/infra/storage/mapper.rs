//! Conversions between SeaORM models and contract models

use super::entity::{ai_usage_log, user_ai_key};
use crate::contract::{KeySource, ProviderKind, UsageRecord, UserAiKey};
use crate::domain::repository::StoredKey;
use anyhow::{anyhow, Context, Result};
use sea_orm::ActiveValue::Set;

pub fn parse_provider(value: &str) -> Result<ProviderKind> {
    ProviderKind::parse(value).ok_or_else(|| anyhow!("unknown provider '{}' in storage", value))
}

impl TryFrom<user_ai_key::Model> for StoredKey {
    type Error = anyhow::Error;

    fn try_from(model: user_ai_key::Model) -> Result<Self> {
        Ok(StoredKey {
            key: UserAiKey {
                id: model.id,
                user_id: model.user_id,
                provider: parse_provider(&model.provider)?,
                key_hint: model.key_hint,
                label: model.label,
                endpoint: model.endpoint,
                is_active: model.is_active,
                is_default: model.is_default,
                last_validated_at: model.last_validated_at,
                last_error: model.last_error,
                created_at: model.created_at,
                updated_at: model.updated_at,
            },
            encrypted_key: model.encrypted_key,
        })
    }
}

impl From<&StoredKey> for user_ai_key::ActiveModel {
    fn from(stored: &StoredKey) -> Self {
        let key = &stored.key;
        user_ai_key::ActiveModel {
            id: Set(key.id),
            user_id: Set(key.user_id),
            provider: Set(key.provider.as_str().to_string()),
            encrypted_key: Set(stored.encrypted_key.clone()),
            key_hint: Set(key.key_hint.clone()),
            label: Set(key.label.clone()),
            endpoint: Set(key.endpoint.clone()),
            is_active: Set(key.is_active),
            is_default: Set(key.is_default),
            last_validated_at: Set(key.last_validated_at),
            last_error: Set(key.last_error.clone()),
            created_at: Set(key.created_at),
            updated_at: Set(key.updated_at),
        }
    }
}

impl TryFrom<ai_usage_log::Model> for UsageRecord {
    type Error = anyhow::Error;

    fn try_from(model: ai_usage_log::Model) -> Result<Self> {
        Ok(UsageRecord {
            id: model.id,
            user_id: model.user_id,
            provider: parse_provider(&model.provider)?,
            model: model.model,
            feature: model.feature,
            input_tokens: u32::try_from(model.input_tokens).context("input_tokens out of range")?,
            output_tokens: u32::try_from(model.output_tokens).context("output_tokens out of range")?,
            cost_micros: model.cost_micros,
            key_source: KeySource::parse(&model.key_source)
                .ok_or_else(|| anyhow!("unknown key source '{}' in storage", model.key_source))?,
            success: model.success,
            error: model.error,
            latency_ms: u64::try_from(model.latency_ms).context("latency_ms out of range")?,
            created_at: model.created_at,
        })
    }
}

impl From<&UsageRecord> for ai_usage_log::ActiveModel {
    fn from(record: &UsageRecord) -> Self {
        ai_usage_log::ActiveModel {
            id: Set(record.id),
            user_id: Set(record.user_id),
            provider: Set(record.provider.as_str().to_string()),
            model: Set(record.model.clone()),
            feature: Set(record.feature.clone()),
            input_tokens: Set(i64::from(record.input_tokens)),
            output_tokens: Set(i64::from(record.output_tokens)),
            cost_micros: Set(record.cost_micros),
            key_source: Set(record.key_source.as_str().to_string()),
            success: Set(record.success),
            error: Set(record.error.clone()),
            latency_ms: Set(i64::try_from(record.latency_ms).unwrap_or(i64::MAX)),
            created_at: Set(record.created_at),
        }
    }
}
