//! OpenAI-compatible chat completions (OpenAI, Groq, OpenRouter)

use super::http::send_json;
use crate::contract::{ChatCompletion, ChatRequest, ProviderKind, TokenUsage};
use crate::domain::{ChatProvider, ProviderCredential, ProviderError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(super) struct WireRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'a str>,
    pub messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
pub(super) struct WireMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireReply,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireReply {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

pub(super) fn wire_request<'a>(model: Option<&'a str>, request: &'a ChatRequest) -> WireRequest<'a> {
    WireRequest {
        model,
        messages: request
            .messages
            .iter()
            .map(|m| WireMessage {
                role: m.role.as_str(),
                content: &m.content,
            })
            .collect(),
        temperature: request.temperature,
        max_tokens: request.max_tokens,
    }
}

pub(super) fn into_completion(
    provider: ProviderKind,
    requested_model: &str,
    response: WireResponse,
) -> Result<ChatCompletion, ProviderError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::InvalidResponse("response has no choices".to_string()))?;
    let usage = response.usage.map_or_else(TokenUsage::default, |u| TokenUsage {
        input_tokens: u.prompt_tokens,
        output_tokens: u.completion_tokens,
    });

    Ok(ChatCompletion {
        provider,
        model: response.model.unwrap_or_else(|| requested_model.to_string()),
        content: choice.message.content.unwrap_or_default(),
        usage,
        finish_reason: choice.finish_reason,
    })
}

/// Adapter for vendors speaking the OpenAI chat completions dialect
pub struct OpenAiCompatible {
    kind: ProviderKind,
    http: reqwest::Client,
    base_url: String,
    default_model: String,
    extra_headers: Vec<(&'static str, String)>,
}

impl OpenAiCompatible {
    pub fn new(kind: ProviderKind, http: reqwest::Client, base_url: String, default_model: String) -> Self {
        Self {
            kind,
            http,
            base_url,
            default_model,
            extra_headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.extra_headers.push((name, value.into()));
        self
    }

    fn authorized(&self, builder: reqwest::RequestBuilder, credential: &ProviderCredential) -> reqwest::RequestBuilder {
        self.extra_headers
            .iter()
            .fold(builder.bearer_auth(&credential.api_key), |b, (name, value)| {
                b.header(*name, value)
            })
    }
}

#[async_trait]
impl ChatProvider for OpenAiCompatible {
    fn kind(&self) -> ProviderKind {
        self.kind
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
        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!(provider = %self.kind, model, "sending chat completion");

        let builder = self.http.post(url).json(&wire_request(Some(model), request));
        let response: WireResponse = send_json(self.authorized(builder, credential)).await?;
        into_completion(self.kind, model, response)
    }

    async fn validate(&self, credential: &ProviderCredential) -> Result<(), ProviderError> {
        let builder = self.http.get(format!("{}/models", self.base_url));
        send_json::<serde_json::Value>(self.authorized(builder, credential)).await?;
        Ok(())
    }
}
