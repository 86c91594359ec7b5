//! Azure OpenAI deployments (the Copilot provider)
//!
//! The resource endpoint travels with the credential; the model name is
//! the deployment name.

use super::http::send_json;
use super::openai::{into_completion, wire_request, WireResponse};
use crate::contract::{ChatCompletion, ChatRequest, ProviderKind};
use crate::domain::{ChatProvider, ProviderCredential, ProviderError};
use async_trait::async_trait;

pub struct AzureOpenAiProvider {
    http: reqwest::Client,
    api_version: String,
    default_deployment: String,
}

impl AzureOpenAiProvider {
    pub fn new(http: reqwest::Client, api_version: String, default_deployment: String) -> Self {
        Self {
            http,
            api_version,
            default_deployment,
        }
    }

    fn endpoint<'a>(&self, credential: &'a ProviderCredential) -> Result<&'a str, ProviderError> {
        credential
            .endpoint
            .as_deref()
            .map(|e| e.trim_end_matches('/'))
            .ok_or_else(|| ProviderError::Misconfigured("azure endpoint is not configured".to_string()))
    }
}

#[async_trait]
impl ChatProvider for AzureOpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Copilot
    }

    fn default_model(&self) -> &str {
        &self.default_deployment
    }

    async fn complete(
        &self,
        credential: &ProviderCredential,
        request: &ChatRequest,
    ) -> Result<ChatCompletion, ProviderError> {
        let endpoint = self.endpoint(credential)?;
        let deployment = request.model.as_deref().unwrap_or(&self.default_deployment);
        let url = format!("{}/openai/deployments/{}/chat/completions", endpoint, deployment);
        tracing::debug!(provider = "copilot", deployment, "sending azure chat completion");

        let builder = self
            .http
            .post(url)
            .query(&[("api-version", self.api_version.as_str())])
            .header("api-key", &credential.api_key)
            .json(&wire_request(None, request));
        let response: WireResponse = send_json(builder).await?;
        into_completion(ProviderKind::Copilot, deployment, response)
    }

    async fn validate(&self, credential: &ProviderCredential) -> Result<(), ProviderError> {
        let endpoint = self.endpoint(credential)?;
        let builder = self
            .http
            .get(format!("{}/openai/models", endpoint))
            .query(&[("api-version", self.api_version.as_str())])
            .header("api-key", &credential.api_key);
        send_json::<serde_json::Value>(builder).await?;
        Ok(())
    }
}
