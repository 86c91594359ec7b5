//! Google Gemini generateContent API

use super::http::send_json;
use crate::contract::{ChatCompletion, ChatRequest, ChatRole, ProviderKind, TokenUsage};
use crate::domain::{ChatProvider, ProviderCredential, ProviderError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest<'a> {
    contents: Vec<WireContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<WireContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct WireContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<WirePart<'a>>,
}

#[derive(Debug, Serialize)]
struct WirePart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
    #[serde(default)]
    usage_metadata: Option<WireUsage>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCandidate {
    #[serde(default)]
    content: Option<WireReply>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireReply {
    #[serde(default)]
    parts: Vec<WireReplyPart>,
}

#[derive(Debug, Deserialize)]
struct WireReplyPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

/// Gemini calls the assistant `model` and takes system text separately
fn wire_request(request: &ChatRequest) -> WireRequest<'_> {
    let system: Vec<WirePart<'_>> = request
        .messages
        .iter()
        .filter(|m| m.role == ChatRole::System)
        .map(|m| WirePart { text: &m.content })
        .collect();

    let contents = request
        .messages
        .iter()
        .filter(|m| m.role != ChatRole::System)
        .map(|m| WireContent {
            role: Some(if m.role == ChatRole::Assistant { "model" } else { "user" }),
            parts: vec![WirePart { text: &m.content }],
        })
        .collect();

    let generation_config = (request.temperature.is_some() || request.max_tokens.is_some()).then_some(
        GenerationConfig {
            temperature: request.temperature,
            max_output_tokens: request.max_tokens,
        },
    );

    WireRequest {
        contents,
        system_instruction: (!system.is_empty()).then_some(WireContent {
            role: None,
            parts: system,
        }),
        generation_config,
    }
}

fn into_completion(requested_model: &str, response: WireResponse) -> Result<ChatCompletion, ProviderError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::InvalidResponse("response has no candidates".to_string()))?;
    let content: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    let usage = response.usage_metadata.map_or_else(TokenUsage::default, |u| TokenUsage {
        input_tokens: u.prompt_token_count,
        output_tokens: u.candidates_token_count,
    });

    Ok(ChatCompletion {
        provider: ProviderKind::Gemini,
        model: response.model_version.unwrap_or_else(|| requested_model.to_string()),
        content,
        usage,
        finish_reason: candidate.finish_reason,
    })
}

/// Gemini answers a bad key with 400 rather than 401
fn reclassify(error: ProviderError) -> ProviderError {
    match error {
        ProviderError::Upstream { status: 400, message } if message.contains("API key not valid") => {
            ProviderError::Unauthorized { message }
        }
        other => other,
    }
}

pub struct GeminiProvider {
    http: reqwest::Client,
    base_url: String,
    default_model: String,
}

impl GeminiProvider {
    pub fn new(http: reqwest::Client, base_url: String, default_model: String) -> Self {
        Self {
            http,
            base_url,
            default_model,
        }
    }
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
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
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);
        tracing::debug!(provider = "gemini", model, "sending generateContent");

        let builder = self
            .http
            .post(url)
            .header("x-goog-api-key", &credential.api_key)
            .json(&wire_request(request));
        let response: WireResponse = send_json(builder).await.map_err(reclassify)?;
        into_completion(model, response)
    }

    async fn validate(&self, credential: &ProviderCredential) -> Result<(), ProviderError> {
        let builder = self
            .http
            .get(format!("{}/v1beta/models", self.base_url))
            .header("x-goog-api-key", &credential.api_key);
        send_json::<serde_json::Value>(builder).await.map_err(reclassify)?;
        Ok(())
    }
}
