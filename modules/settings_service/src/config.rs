//! Configuration for settings service module

use serde::{Deserialize, Serialize};

/// Settings service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Enable JSON Schema validation
    #[serde(default = "default_true")]
    pub enable_schema_validation: bool,

    /// Maximum serialized value size in bytes
    #[serde(default = "default_max_value_bytes")]
    pub max_value_bytes: usize,

    /// Settings created at startup when missing; existing values are kept
    #[serde(default)]
    pub seed: Vec<SeedSetting>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedSetting {
    pub key: String,
    pub value: serde_json::Value,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub schema: Option<serde_json::Value>,
    #[serde(default)]
    pub is_public: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enable_schema_validation: true,
            max_value_bytes: default_max_value_bytes(),
            seed: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_value_bytes() -> usize {
    64 * 1024
}
