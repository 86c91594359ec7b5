//! Shared request plumbing for vendor adapters

use crate::domain::ProviderError;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::Value;

const MAX_ERROR_MESSAGE: usize = 300;

/// Send a request and decode a 2xx JSON body
pub(super) async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::Transport(e.without_url().to_string()))?;
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::Transport(e.without_url().to_string()))?;

    if !(200..300).contains(&status) {
        return Err(status_error(status, &body));
    }
    serde_json::from_str(&body).map_err(|e| ProviderError::InvalidResponse(e.to_string()))
}

/// Classify a non-2xx vendor answer
pub(super) fn status_error(status: u16, body: &str) -> ProviderError {
    let message = error_message(body).unwrap_or_else(|| format!("HTTP {}", status));
    match status {
        401 | 403 => ProviderError::Unauthorized { message },
        429 => ProviderError::RateLimited,
        _ => ProviderError::Upstream { status, message },
    }
}

/// Pull the human-readable message out of the usual vendor error shapes
pub(super) fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    // Gemini sometimes wraps the error object in an array
    let value = match value {
        Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
        other => other,
    };

    let message = value
        .pointer("/error/message")
        .and_then(Value::as_str)
        .or_else(|| value.get("error").and_then(Value::as_str))
        .or_else(|| value.get("message").and_then(Value::as_str))?;

    Some(message.chars().take(MAX_ERROR_MESSAGE).collect())
}
