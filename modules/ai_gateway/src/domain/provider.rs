//! Provider abstraction the gateway dispatches to

use crate::contract::{ChatCompletion, ChatRequest, ProviderKind};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Failure reported by a vendor adapter
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// 401/403 from the vendor
    #[error("credential rejected: {message}")]
    Unauthorized { message: String },

    #[error("rate limited")]
    RateLimited,

    #[error("upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The credential lacks something the vendor needs (an Azure endpoint)
    #[error("misconfigured: {0}")]
    Misconfigured(String),
}

/// Decrypted key material handed to an adapter for one call
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderCredential {
    pub api_key: String,
    /// Azure resource endpoint
    pub endpoint: Option<String>,
}

impl ProviderCredential {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: Option<String>) -> Self {
        self.endpoint = endpoint;
        self
    }
}

impl std::fmt::Debug for ProviderCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCredential")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// One chat vendor
#[async_trait]
pub trait ChatProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn default_model(&self) -> &str;

    /// Run a completion; `request.model` falls back to [`Self::default_model`]
    async fn complete(
        &self,
        credential: &ProviderCredential,
        request: &ChatRequest,
    ) -> Result<ChatCompletion, ProviderError>;

    /// Cheap authenticated call proving the credential works
    async fn validate(&self, credential: &ProviderCredential) -> Result<(), ProviderError>;
}

/// Adapters by provider kind
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<ProviderKind, Arc<dyn ChatProvider>>,
}

impl ProviderRegistry {
    pub fn new(providers: Vec<Arc<dyn ChatProvider>>) -> Self {
        Self {
            providers: providers.into_iter().map(|p| (p.kind(), p)).collect(),
        }
    }

    pub fn get(&self, kind: ProviderKind) -> Option<Arc<dyn ChatProvider>> {
        self.providers.get(&kind).cloned()
    }

    pub fn kinds(&self) -> Vec<ProviderKind> {
        let mut kinds: Vec<_> = self.providers.keys().copied().collect();
        kinds.sort();
        kinds
    }
}
