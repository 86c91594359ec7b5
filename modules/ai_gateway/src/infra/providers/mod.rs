//! Vendor adapters behind the `ChatProvider` trait

mod azure;
mod claude;
mod gemini;
mod http;
mod openai;

pub use azure::AzureOpenAiProvider;
pub use claude::ClaudeProvider;
pub use gemini::GeminiProvider;
pub use openai::OpenAiCompatible;

use crate::config::Config;
use crate::contract::ProviderKind;
use crate::domain::{ChatProvider, ProviderRegistry};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Build one adapter per provider kind from configuration
pub fn build_registry(config: &Config) -> Result<ProviderRegistry> {
    let http = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .user_agent(concat!("brainforge-ai-gateway/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build provider HTTP client")?;

    let base_url = |kind: ProviderKind| -> Result<String> {
        config
            .base_url(kind)
            .with_context(|| format!("no base URL for provider {}", kind))
    };

    let providers: Vec<Arc<dyn ChatProvider>> = vec![
        Arc::new(OpenAiCompatible::new(
            ProviderKind::OpenAi,
            http.clone(),
            base_url(ProviderKind::OpenAi)?,
            config.default_model(ProviderKind::OpenAi),
        )),
        Arc::new(OpenAiCompatible::new(
            ProviderKind::Groq,
            http.clone(),
            base_url(ProviderKind::Groq)?,
            config.default_model(ProviderKind::Groq),
        )),
        Arc::new(
            OpenAiCompatible::new(
                ProviderKind::OpenRouter,
                http.clone(),
                base_url(ProviderKind::OpenRouter)?,
                config.default_model(ProviderKind::OpenRouter),
            )
            .with_header("HTTP-Referer", config.app_url.clone())
            .with_header("X-Title", config.app_name.clone()),
        ),
        Arc::new(ClaudeProvider::new(
            http.clone(),
            base_url(ProviderKind::Claude)?,
            config.default_model(ProviderKind::Claude),
        )),
        Arc::new(GeminiProvider::new(
            http.clone(),
            base_url(ProviderKind::Gemini)?,
            config.default_model(ProviderKind::Gemini),
        )),
        Arc::new(AzureOpenAiProvider::new(
            http,
            config.azure_api_version.clone(),
            config.default_model(ProviderKind::Copilot),
        )),
    ];

    tracing::debug!(count = providers.len(), "ai provider adapters ready");
    Ok(ProviderRegistry::new(providers))
}
