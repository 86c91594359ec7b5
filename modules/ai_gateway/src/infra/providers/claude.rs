//! Anthropic Messages API

use super::http::send_json;
use crate::contract::{ChatCompletion, ChatRequest, ChatRole, ProviderKind, TokenUsage};
use crate::domain::{ChatProvider, ProviderCredential, ProviderError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 1024;

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    content: Vec<WireBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct WireBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

/// System messages become the top-level `system` field
fn wire_request<'a>(model: &'a str, request: &'a ChatRequest) -> WireRequest<'a> {
    let system: Vec<&str> = request
        .messages
        .iter()
        .filter(|m| m.role == ChatRole::System)
        .map(|m| m.content.as_str())
        .collect();

    WireRequest {
        model,
        max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        system: (!system.is_empty()).then(|| system.join("\n\n")),
        messages: request
            .messages
            .iter()
            .filter(|m| m.role != ChatRole::System)
            .map(|m| WireMessage {
                role: m.role.as_str(),
                content: &m.content,
            })
            .collect(),
        temperature: request.temperature,
    }
}

fn into_completion(requested_model: &str, response: WireResponse) -> Result<ChatCompletion, ProviderError> {
    if response.content.is_empty() {
        return Err(ProviderError::InvalidResponse("response has no content blocks".to_string()));
    }
    let content: String = response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .collect();
    let usage = response.usage.map_or_else(TokenUsage::default, |u| TokenUsage {
        input_tokens: u.input_tokens,
        output_tokens: u.output_tokens,
    });

    Ok(ChatCompletion {
        provider: ProviderKind::Claude,
        model: response.model.unwrap_or_else(|| requested_model.to_string()),
        content,
        usage,
        finish_reason: response.stop_reason,
    })
}

pub struct ClaudeProvider {
    http: reqwest::Client,
    base_url: String,
    default_model: String,
}

impl ClaudeProvider {
    pub fn new(http: reqwest::Client, base_url: String, default_model: String) -> Self {
        Self {
            http,
            base_url,
            default_model,
        }
    }

    fn authorized(&self, builder: reqwest::RequestBuilder, credential: &ProviderCredential) -> reqwest::RequestBuilder {
        builder
            .header("x-api-key", &credential.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
    }
}

#[async_trait]
impl ChatProvider for ClaudeProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Claude
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    async fn complete(
        &self,
        credential: &ProviderCredential,
        request: &ChatRequest,
    ) -> Result<ChatCompletion, ProviderError> {
        let model = request.model.as_deref().unwrap_or(&self.default_model);
        let body = wire_request(model, request);
        if body.messages.is_empty() {
            return Err(ProviderError::Misconfigured(
                "claude needs at least one user message".to_string(),
            ));
        }
        tracing::debug!(provider = "claude", model, "sending messages request");

        let builder = self.http.post(format!("{}/v1/messages", self.base_url)).json(&body);
        let response: WireResponse = send_json(self.authorized(builder, credential)).await?;
        into_completion(model, response)
    }

    async fn validate(&self, credential: &ProviderCredential) -> Result<(), ProviderError> {
        let builder = self.http.get(format!("{}/v1/models", self.base_url));
        send_json::<serde_json::Value>(self.authorized(builder, credential)).await?;
        Ok(())
    }
}
