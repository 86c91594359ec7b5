//! Domain service - business logic orchestration
//!
//! Key management, chat dispatch and usage reporting share one `Service`;
//! each concern lives in its own submodule.

mod chat;
mod keys;
mod usage;

use super::crypto::KeyCipher;
use super::provider::{ChatProvider, ProviderRegistry};
use super::repository::{AiKeyRepository, UsageRepository};
use crate::config::Config;
use crate::contract::{AiGatewayError, ProviderInfo, ProviderKind};
use brainforge_kit::SecurityCtx;
use std::sync::Arc;

/// Log a repository or crypto failure and hide it behind `Internal`
pub(crate) fn internal(error: anyhow::Error) -> AiGatewayError {
    tracing::error!(error = ?error, "ai gateway internal failure");
    AiGatewayError::Internal
}

/// Domain service for the AI gateway
pub struct Service {
    keys: Arc<dyn AiKeyRepository>,
    usage: Arc<dyn UsageRepository>,
    providers: ProviderRegistry,
    cipher: KeyCipher,
    config: Config,
}

impl Service {
    pub fn new(
        keys: Arc<dyn AiKeyRepository>,
        usage: Arc<dyn UsageRepository>,
        providers: ProviderRegistry,
        cipher: KeyCipher,
        config: Config,
    ) -> Self {
        Self {
            keys,
            usage,
            providers,
            cipher,
            config,
        }
    }

    /// Providers the gateway can reach and which keys the caller has for them
    pub async fn list_providers(&self, ctx: &SecurityCtx) -> Result<Vec<ProviderInfo>, AiGatewayError> {
        let user_keys = self.keys.list_for_user(ctx.user_id).await.map_err(internal)?;
        let default_provider = user_keys
            .iter()
            .find(|k| k.is_default)
            .map(|k| k.provider)
            .unwrap_or(self.config.default_provider);

        Ok(self
            .providers
            .kinds()
            .into_iter()
            .map(|kind| ProviderInfo {
                provider: kind,
                default_model: self.config.default_model(kind),
                has_user_key: user_keys.iter().any(|k| k.provider == kind && k.is_active),
                has_system_key: self.config.system_key(kind).is_some(),
                is_default: kind == default_provider,
            })
            .collect())
    }

    // ===== Helper Methods =====

    fn provider(&self, kind: ProviderKind) -> Result<Arc<dyn ChatProvider>, AiGatewayError> {
        self.providers.get(kind).ok_or_else(|| AiGatewayError::ProviderUnavailable {
            provider: kind,
            message: "provider is not enabled".to_string(),
        })
    }
}
