//! Native client trait for in-process callers

use super::error::AiGatewayError;
use super::model::{ChatCompletion, ChatRequest, ProviderKind};
use async_trait::async_trait;
use uuid::Uuid;

/// Gateway API exposed to other modules
#[async_trait]
pub trait AiGatewayApi: Send + Sync {
    /// Run a chat completion on behalf of `user_id`, metered under `feature`.
    ///
    /// `provider` overrides the user's default provider.
    async fn chat(
        &self,
        user_id: Uuid,
        feature: &str,
        provider: Option<ProviderKind>,
        request: ChatRequest,
    ) -> Result<ChatCompletion, AiGatewayError>;
}
