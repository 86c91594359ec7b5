//! Configuration for planner service module

use serde::{Deserialize, Serialize};

/// Planner service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Maximum number of tags on a task or note
    #[serde(default = "default_max_tags")]
    pub max_tags: usize,

    /// Maximum length of task descriptions and note bodies, in characters
    #[serde(default = "default_max_body_length")]
    pub max_body_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_tags: default_max_tags(),
            max_body_length: default_max_body_length(),
        }
    }
}

fn default_max_tags() -> usize {
    20
}

fn default_max_body_length() -> usize {
    100_000
}
