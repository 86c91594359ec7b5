//! Input validation for keys and chat requests

use crate::contract::{AiGatewayError, ChatRequest, ProviderKind};
use url::Url;

const MAX_LABEL_LENGTH: usize = 100;
const MAX_FEATURE_LENGTH: usize = 64;
const MAX_KEY_LENGTH: usize = 512;
pub const MAX_OUTPUT_TOKENS: u32 = 32_768;

pub fn validate_api_key(api_key: &str) -> Result<String, AiGatewayError> {
    let key = api_key.trim();
    if key.is_empty() {
        return Err(AiGatewayError::validation("API key cannot be empty"));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(AiGatewayError::validation("API key is too long"));
    }
    if key.chars().any(char::is_whitespace) {
        return Err(AiGatewayError::validation("API key cannot contain whitespace"));
    }
    Ok(key.to_string())
}

pub fn validate_label(label: Option<String>) -> Result<Option<String>, AiGatewayError> {
    let Some(label) = label else {
        return Ok(None);
    };
    let label = label.trim();
    if label.is_empty() {
        return Ok(None);
    }
    if label.chars().count() > MAX_LABEL_LENGTH {
        return Err(AiGatewayError::validation(format!(
            "label cannot exceed {} characters",
            MAX_LABEL_LENGTH
        )));
    }
    Ok(Some(label.to_string()))
}

/// Copilot keys need an https Azure endpoint; other providers take none
pub fn validate_endpoint(
    provider: ProviderKind,
    endpoint: Option<String>,
) -> Result<Option<String>, AiGatewayError> {
    let endpoint = endpoint.map(|e| e.trim().to_string()).filter(|e| !e.is_empty());

    if !provider.requires_endpoint() {
        return match endpoint {
            Some(_) => Err(AiGatewayError::validation(format!(
                "{} keys do not take an endpoint",
                provider
            ))),
            None => Ok(None),
        };
    }

    let Some(endpoint) = endpoint else {
        return Err(AiGatewayError::validation(format!("{} keys require an endpoint", provider)));
    };
    let url = Url::parse(&endpoint)
        .map_err(|e| AiGatewayError::validation(format!("invalid endpoint: {}", e)))?;
    if url.scheme() != "https" {
        return Err(AiGatewayError::validation("endpoint must use https"));
    }
    Ok(Some(endpoint.trim_end_matches('/').to_string()))
}

pub fn validate_feature(feature: &str) -> Result<String, AiGatewayError> {
    let feature = feature.trim().to_ascii_lowercase();
    if feature.is_empty() || feature.len() > MAX_FEATURE_LENGTH {
        return Err(AiGatewayError::validation("feature must be 1-64 characters"));
    }
    if !feature.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(AiGatewayError::validation(
            "feature may only contain letters, digits and underscores",
        ));
    }
    Ok(feature)
}

pub fn validate_chat_request(request: &ChatRequest) -> Result<(), AiGatewayError> {
    if request.messages.is_empty() {
        return Err(AiGatewayError::validation("at least one message is required"));
    }
    if request.messages.iter().all(|m| m.content.trim().is_empty()) {
        return Err(AiGatewayError::validation("messages cannot all be empty"));
    }
    if let Some(temperature) = request.temperature {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(AiGatewayError::validation("temperature must be between 0 and 2"));
        }
    }
    if let Some(max_tokens) = request.max_tokens {
        if max_tokens == 0 || max_tokens > MAX_OUTPUT_TOKENS {
            return Err(AiGatewayError::validation(format!(
                "max_tokens must be between 1 and {}",
                MAX_OUTPUT_TOKENS
            )));
        }
    }
    if let Some(model) = &request.model {
        if model.trim().is_empty() {
            return Err(AiGatewayError::validation("model cannot be blank"));
        }
    }
    Ok(())
}
