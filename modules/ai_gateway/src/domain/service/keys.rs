//! User key management

use super::{internal, Service};
use crate::contract::{AiGatewayError, NewAiKey, ProviderKind, UserAiKey};
use crate::domain::crypto::key_hint;
use crate::domain::provider::{ProviderCredential, ProviderError};
use crate::domain::repository::StoredKey;
use crate::domain::validation;
use brainforge_kit::SecurityCtx;
use chrono::Utc;
use uuid::Uuid;

impl Service {
    /// Store (or replace) the caller's key for a provider.
    ///
    /// With `validate` set the key is tried against the provider first and
    /// a rejected key is not stored. The first key a user saves becomes
    /// their default.
    pub async fn save_key(&self, ctx: &SecurityCtx, input: NewAiKey) -> Result<UserAiKey, AiGatewayError> {
        let provider = input.provider;
        let api_key = validation::validate_api_key(&input.api_key)?;
        let label = validation::validate_label(input.label)?;
        let endpoint = validation::validate_endpoint(provider, input.endpoint)?;

        let now = Utc::now();
        let mut last_validated_at = None;
        if input.validate {
            let credential = ProviderCredential::new(api_key.clone()).with_endpoint(endpoint.clone());
            match self.provider(provider)?.validate(&credential).await {
                Ok(()) => last_validated_at = Some(now),
                Err(ProviderError::Unauthorized { message }) => {
                    tracing::info!(user_id = %ctx.user_id, provider = %provider, "rejected key on save");
                    return Err(AiGatewayError::key_invalid(provider, message));
                }
                Err(e) => return Err(provider_failure(provider, e)),
            }
        }

        let encrypted_key = self.cipher.encrypt(&api_key).map_err(internal)?;
        let existing = self.keys.find(ctx.user_id, provider).await.map_err(internal)?;

        let saved = match existing {
            Some(stored) => {
                let key = UserAiKey {
                    key_hint: key_hint(&api_key),
                    label,
                    endpoint,
                    is_active: true,
                    last_validated_at,
                    last_error: None,
                    updated_at: now,
                    ..stored.key
                };
                self.keys
                    .update(&StoredKey { key, encrypted_key })
                    .await
                    .map_err(internal)?
            }
            None => {
                let has_default = self.keys.find_default(ctx.user_id).await.map_err(internal)?.is_some();
                let key = UserAiKey {
                    id: Uuid::new_v4(),
                    user_id: ctx.user_id,
                    provider,
                    key_hint: key_hint(&api_key),
                    label,
                    endpoint,
                    is_active: true,
                    is_default: !has_default,
                    last_validated_at,
                    last_error: None,
                    created_at: now,
                    updated_at: now,
                };
                self.keys
                    .create(&StoredKey { key, encrypted_key })
                    .await
                    .map_err(internal)?
            }
        };

        tracing::info!(
            user_id = %ctx.user_id,
            provider = %provider,
            key_hint = %saved.key_hint,
            validated = input.validate,
            "saved ai key"
        );
        Ok(saved)
    }

    /// Key metadata of the caller; never the key itself
    pub async fn list_keys(&self, ctx: &SecurityCtx) -> Result<Vec<UserAiKey>, AiGatewayError> {
        self.keys.list_for_user(ctx.user_id).await.map_err(internal)
    }

    pub async fn delete_key(&self, ctx: &SecurityCtx, provider: ProviderKind) -> Result<(), AiGatewayError> {
        if !self.keys.delete(ctx.user_id, provider).await.map_err(internal)? {
            return Err(AiGatewayError::not_found("ai key", provider));
        }
        tracing::info!(user_id = %ctx.user_id, provider = %provider, "deleted ai key");
        Ok(())
    }

    /// Make the caller's key for `provider` their default; it must be active
    pub async fn set_default_provider(
        &self,
        ctx: &SecurityCtx,
        provider: ProviderKind,
    ) -> Result<UserAiKey, AiGatewayError> {
        let stored = self.find_key(ctx.user_id, provider).await?;
        if !stored.key.is_active {
            return Err(AiGatewayError::validation(format!(
                "the {} key is inactive; validate or replace it first",
                provider
            )));
        }

        self.keys.set_default(ctx.user_id, provider).await.map_err(internal)?;
        Ok(UserAiKey {
            is_default: true,
            ..stored.key
        })
    }

    /// Re-check a stored key against its provider.
    ///
    /// A rejected key is deactivated and the returned metadata carries the
    /// provider's message; other provider failures are returned as errors
    /// and leave the key untouched.
    pub async fn validate_key(&self, ctx: &SecurityCtx, provider: ProviderKind) -> Result<UserAiKey, AiGatewayError> {
        let stored = self.find_key(ctx.user_id, provider).await?;
        let credential = self.decrypt(&stored)?;

        let now = Utc::now();
        let key = match self.provider(provider)?.validate(&credential).await {
            Ok(()) => UserAiKey {
                is_active: true,
                last_validated_at: Some(now),
                last_error: None,
                updated_at: now,
                ..stored.key
            },
            Err(ProviderError::Unauthorized { message }) => {
                tracing::warn!(user_id = %ctx.user_id, provider = %provider, "ai key failed validation");
                UserAiKey {
                    is_active: false,
                    last_error: Some(message),
                    updated_at: now,
                    ..stored.key
                }
            }
            Err(e) => return Err(provider_failure(provider, e)),
        };

        self.keys
            .update(&StoredKey {
                key,
                encrypted_key: stored.encrypted_key,
            })
            .await
            .map_err(internal)
    }

    // ===== Helpers =====

    async fn find_key(&self, user_id: Uuid, provider: ProviderKind) -> Result<StoredKey, AiGatewayError> {
        self.keys
            .find(user_id, provider)
            .await
            .map_err(internal)?
            .ok_or_else(|| AiGatewayError::not_found("ai key", provider))
    }

    pub(super) fn decrypt(&self, stored: &StoredKey) -> Result<ProviderCredential, AiGatewayError> {
        let api_key = self.cipher.decrypt(&stored.encrypted_key).map_err(internal)?;
        Ok(ProviderCredential::new(api_key).with_endpoint(stored.key.endpoint.clone()))
    }

    /// Flag a user key the provider refused
    pub(super) async fn deactivate(&self, stored: StoredKey, message: &str) {
        let key = UserAiKey {
            is_active: false,
            last_error: Some(message.to_string()),
            updated_at: Utc::now(),
            ..stored.key
        };
        let (user_id, provider) = (key.user_id, key.provider);
        if let Err(e) = self
            .keys
            .update(&StoredKey {
                key,
                encrypted_key: stored.encrypted_key,
            })
            .await
        {
            tracing::error!(error = ?e, user_id = %user_id, provider = %provider, "failed to deactivate ai key");
        } else {
            tracing::warn!(user_id = %user_id, provider = %provider, "deactivated ai key rejected by provider");
        }
    }
}

/// Map non-credential provider failures
pub(super) fn provider_failure(provider: ProviderKind, error: ProviderError) -> AiGatewayError {
    match error {
        ProviderError::RateLimited => AiGatewayError::RateLimited { provider },
        ProviderError::Unauthorized { message } => AiGatewayError::key_invalid(provider, message),
        ProviderError::Misconfigured(message) => AiGatewayError::validation(message),
        other => AiGatewayError::ProviderUnavailable {
            provider,
            message: other.to_string(),
        },
    }
}
