//! Configuration for ideation service module

use serde::{Deserialize, Serialize};

/// Ideation service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Ideas a single session may hold
    #[serde(default = "default_max_ideas")]
    pub max_ideas_per_session: usize,

    /// Longest accepted Mermaid source, in characters
    #[serde(default = "default_max_source_length")]
    pub max_source_length: usize,

    /// Sampling temperature for idea generation
    #[serde(default = "default_idea_temperature")]
    pub idea_temperature: f32,

    /// `max_tokens` sent with every ideation completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Backlog tasks listed in a sprint planning prompt
    #[serde(default = "default_max_backlog_in_prompt")]
    pub max_backlog_in_prompt: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_ideas_per_session: default_max_ideas(),
            max_source_length: default_max_source_length(),
            idea_temperature: default_idea_temperature(),
            max_tokens: default_max_tokens(),
            max_backlog_in_prompt: default_max_backlog_in_prompt(),
        }
    }
}

fn default_max_ideas() -> usize {
    200
}

fn default_max_source_length() -> usize {
    20_000
}

fn default_idea_temperature() -> f32 {
    0.9
}

fn default_max_tokens() -> u32 {
    1500
}

fn default_max_backlog_in_prompt() -> usize {
    100
}
