//! Configuration for the AI gateway module

use crate::contract::ProviderKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// AI gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Secret the key-encryption key is derived from
    #[serde(default)]
    pub encryption_secret: String,

    /// Per-request timeout toward vendors
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Provider used when neither the request nor the user picks one
    #[serde(default = "default_provider")]
    pub default_provider: ProviderKind,

    /// `api-version` query parameter sent to Azure OpenAI
    #[serde(default = "default_azure_api_version")]
    pub azure_api_version: String,

    /// Sent to OpenRouter as `HTTP-Referer`
    #[serde(default = "default_app_url")]
    pub app_url: String,

    /// Sent to OpenRouter as `X-Title`
    #[serde(default = "default_app_name")]
    pub app_name: String,

    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            encryption_secret: String::new(),
            request_timeout: default_request_timeout(),
            default_provider: default_provider(),
            azure_api_version: default_azure_api_version(),
            app_url: default_app_url(),
            app_name: default_app_name(),
            providers: ProvidersConfig::default(),
        }
    }
}

/// Per-vendor overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub openai: ProviderConfig,
    #[serde(default)]
    pub claude: ProviderConfig,
    #[serde(default)]
    pub gemini: ProviderConfig,
    #[serde(default)]
    pub groq: ProviderConfig,
    #[serde(default)]
    pub openrouter: ProviderConfig,
    /// For Copilot `base_url` is the Azure resource endpoint used with the system key
    #[serde(default)]
    pub copilot: ProviderConfig,
}

impl ProvidersConfig {
    pub fn get(&self, kind: ProviderKind) -> &ProviderConfig {
        match kind {
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::Claude => &self.claude,
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::Groq => &self.groq,
            ProviderKind::OpenRouter => &self.openrouter,
            ProviderKind::Copilot => &self.copilot,
        }
    }

    pub fn get_mut(&mut self, kind: ProviderKind) -> &mut ProviderConfig {
        match kind {
            ProviderKind::OpenAi => &mut self.openai,
            ProviderKind::Claude => &mut self.claude,
            ProviderKind::Gemini => &mut self.gemini,
            ProviderKind::Groq => &mut self.groq,
            ProviderKind::OpenRouter => &mut self.openrouter,
            ProviderKind::Copilot => &mut self.copilot,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Vendor API root; the public endpoint when unset
    #[serde(default)]
    pub base_url: Option<String>,

    /// System fallback key used when a user has none for this provider
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub default_model: Option<String>,
}

impl Config {
    /// API root for a vendor, without a trailing slash
    pub fn base_url(&self, kind: ProviderKind) -> Option<String> {
        self.providers
            .get(kind)
            .base_url
            .clone()
            .or_else(|| kind.public_base_url().map(str::to_string))
            .map(|url| url.trim_end_matches('/').to_string())
    }

    pub fn default_model(&self, kind: ProviderKind) -> String {
        self.providers
            .get(kind)
            .default_model
            .clone()
            .unwrap_or_else(|| kind.builtin_model().to_string())
    }

    pub fn system_key(&self, kind: ProviderKind) -> Option<&str> {
        self.providers
            .get(kind)
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_provider() -> ProviderKind {
    ProviderKind::OpenAi
}

fn default_azure_api_version() -> String {
    "2024-06-01".to_string()
}

fn default_app_url() -> String {
    "https://brainforge.local".to_string()
}

fn default_app_name() -> String {
    "BrainForge".to_string()
}
