//! Chat dispatch with key resolution and metering

use super::keys::provider_failure;
use super::{internal, Service};
use crate::contract::{
    AiGatewayError, ChatCompletion, ChatRequest, KeySource, ProviderKind, TokenUsage, UsageRecord,
};
use crate::domain::pricing;
use crate::domain::provider::{ProviderCredential, ProviderError};
use crate::domain::repository::StoredKey;
use crate::domain::validation;
use chrono::Utc;
use std::time::Instant;
use uuid::Uuid;

/// Credential picked for one call
struct ResolvedKey {
    credential: ProviderCredential,
    source: KeySource,
    /// Set when the user's own key is used
    stored: Option<StoredKey>,
}

impl Service {
    /// Run a chat completion for a user and meter it.
    ///
    /// Provider: explicit, else the user's default key, else the configured
    /// default. Credential: the user's active key, else the system key.
    /// Every attempt that reaches a provider writes one usage row.
    pub async fn chat(
        &self,
        user_id: Uuid,
        feature: &str,
        provider: Option<ProviderKind>,
        mut request: ChatRequest,
    ) -> Result<ChatCompletion, AiGatewayError> {
        let feature = validation::validate_feature(feature)?;
        validation::validate_chat_request(&request)?;

        let kind = match provider {
            Some(kind) => kind,
            None => self
                .keys
                .find_default(user_id)
                .await
                .map_err(internal)?
                .map(|k| k.provider)
                .unwrap_or(self.config.default_provider),
        };
        let adapter = self.provider(kind)?;
        let resolved = self.resolve_key(user_id, kind).await?;

        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.config.default_model(kind));
        request.model = Some(model.clone());

        let started = Instant::now();
        let result = adapter.complete(&resolved.credential, &request).await;
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let mut record = UsageRecord {
            id: Uuid::new_v4(),
            user_id,
            provider: kind,
            model,
            feature,
            input_tokens: 0,
            output_tokens: 0,
            cost_micros: 0,
            key_source: resolved.source,
            success: false,
            error: None,
            latency_ms,
            created_at: Utc::now(),
        };

        match result {
            Ok(completion) => {
                record.model = completion.model.clone();
                record.input_tokens = completion.usage.input_tokens;
                record.output_tokens = completion.usage.output_tokens;
                record.cost_micros = pricing::cost_micros(kind, &completion.model, completion.usage);
                record.success = true;
                self.meter(&record).await;

                tracing::info!(
                    user_id = %user_id,
                    provider = %kind,
                    model = %completion.model,
                    feature = %record.feature,
                    input_tokens = completion.usage.input_tokens,
                    output_tokens = completion.usage.output_tokens,
                    latency_ms,
                    "chat completion"
                );
                Ok(completion)
            }
            Err(error) => {
                record.error = Some(error.to_string());
                self.meter(&record).await;
                tracing::warn!(
                    user_id = %user_id,
                    provider = %kind,
                    key_source = resolved.source.as_str(),
                    error = %error,
                    "chat completion failed"
                );
                Err(self.chat_failure(kind, resolved, error).await)
            }
        }
    }

    async fn resolve_key(&self, user_id: Uuid, kind: ProviderKind) -> Result<ResolvedKey, AiGatewayError> {
        if let Some(stored) = self.keys.find(user_id, kind).await.map_err(internal)? {
            if !stored.key.is_active {
                let reason = stored
                    .key
                    .last_error
                    .clone()
                    .unwrap_or_else(|| "key is deactivated".to_string());
                return Err(AiGatewayError::key_invalid(kind, reason));
            }
            return Ok(ResolvedKey {
                credential: self.decrypt(&stored)?,
                source: KeySource::User,
                stored: Some(stored),
            });
        }

        match self.config.system_key(kind) {
            Some(key) => {
                let endpoint = if kind.requires_endpoint() {
                    self.config.base_url(kind)
                } else {
                    None
                };
                Ok(ResolvedKey {
                    credential: ProviderCredential::new(key).with_endpoint(endpoint),
                    source: KeySource::System,
                    stored: None,
                })
            }
            None => Err(AiGatewayError::NoKeyConfigured { provider: kind }),
        }
    }

    async fn chat_failure(&self, kind: ProviderKind, resolved: ResolvedKey, error: ProviderError) -> AiGatewayError {
        match (error, resolved.stored) {
            (ProviderError::Unauthorized { message }, Some(stored)) => {
                self.deactivate(stored, &message).await;
                AiGatewayError::key_invalid(kind, message)
            }
            (ProviderError::Unauthorized { .. }, None) => {
                tracing::error!(provider = %kind, "system ai key was rejected by the provider");
                AiGatewayError::ProviderUnavailable {
                    provider: kind,
                    message: "the system key was rejected".to_string(),
                }
            }
            (other, _) => provider_failure(kind, other),
        }
    }

    async fn meter(&self, record: &UsageRecord) {
        if let Err(e) = self.usage.record(record).await {
            tracing::error!(error = ?e, user_id = %record.user_id, "failed to write ai usage record");
        }
    }
}
