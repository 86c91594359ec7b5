//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{AiGatewayApi, AiGatewayError, ChatCompletion, ChatRequest, ProviderKind};
use crate::domain::Service;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Gateway handle given to ideation
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl AiGatewayApi for NativeClient {
    async fn chat(
        &self,
        user_id: Uuid,
        feature: &str,
        provider: Option<ProviderKind>,
        request: ChatRequest,
    ) -> Result<ChatCompletion, AiGatewayError> {
        self.service.chat(user_id, feature, provider, request).await
    }
}
