//! Application configuration
//!
//! Built-in defaults, then an optional YAML file, then `BRAINFORGE__`
//! environment variables (`BRAINFORGE__SERVER__BIND_ADDR=0.0.0.0:9000`).

use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config/brainforge.yaml";
pub const ENV_PREFIX: &str = "BRAINFORGE__";

const REDACTED: &str = "***";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub auth: AuthConfig,
    pub identity: identity_service::config::Config,
    pub planner: planner_service::config::Config,
    pub ideation: ideation_service::config::Config,
    pub ai: ai_gateway::config::Config,
    pub realtime: realtime_hub::config::Config,
    pub settings: settings_service::config::Config,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: String,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Allowed browser origins; `*` allows any
    pub cors_allowed_origins: Vec<String>,
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            request_timeout: Duration::from_secs(30),
            cors_allowed_origins: vec!["http://localhost:3000".to_string()],
            body_limit_bytes: 2 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// `postgres://...` or `sqlite://...`
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://brainforge.db?mode=rwc".to_string(),
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info,sqlx=warn,sea_orm_migration=warn".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    #[serde(with = "humantime_serde")]
    pub token_ttl: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_issuer: "brainforge".to_string(),
            token_ttl: Duration::from_secs(24 * 60 * 60),
        }
    }
}

impl AppConfig {
    /// Load the layered configuration.
    ///
    /// An explicit `path` must exist; without one the default file is read
    /// when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        match path {
            Some(path) => {
                if !path.exists() {
                    bail!("config file {} does not exist", path.display());
                }
                figment = figment.merge(Yaml::file(path));
            }
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                figment = figment.merge(Yaml::file(DEFAULT_CONFIG_PATH));
            }
            None => {}
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("invalid configuration")
    }

    /// Checks that need every layer applied
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.len() < 32 {
            bail!("auth.jwt_secret must be at least 32 characters");
        }
        if self.ai.encryption_secret.trim().is_empty() {
            bail!("ai.encryption_secret must be set");
        }
        if self.database.max_connections == 0 {
            bail!("database.max_connections must be positive");
        }
        Ok(())
    }

    /// Copy with secrets and database credentials masked, for `--print-config`
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        config.database.url = brainforge_kit::db::redact_url(&config.database.url);
        mask(&mut config.auth.jwt_secret);
        mask(&mut config.ai.encryption_secret);
        for kind in ai_gateway::ProviderKind::ALL {
            if let Some(key) = config.ai.providers.get_mut(kind).api_key.as_mut() {
                mask(key);
            }
        }
        config
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("failed to render configuration")
    }
}

fn mask(secret: &mut String) {
    if !secret.is_empty() {
        *secret = REDACTED.to_string();
    }
}
