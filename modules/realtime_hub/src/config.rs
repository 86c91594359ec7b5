//! Configuration for the realtime hub

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Realtime hub configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Events buffered per subscriber before it lags
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Presence without a heartbeat for this long is dropped
    #[serde(default = "default_presence_ttl", with = "humantime_serde")]
    pub presence_ttl: Duration,

    /// How often expired presence is swept
    #[serde(default = "default_prune_interval", with = "humantime_serde")]
    pub prune_interval: Duration,

    /// SSE keep-alive comment interval
    #[serde(default = "default_keep_alive", with = "humantime_serde")]
    pub keep_alive: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
            presence_ttl: default_presence_ttl(),
            prune_interval: default_prune_interval(),
            keep_alive: default_keep_alive(),
        }
    }
}

fn default_channel_capacity() -> usize {
    1024
}

fn default_presence_ttl() -> Duration {
    Duration::from_secs(90)
}

fn default_prune_interval() -> Duration {
    Duration::from_secs(30)
}

fn default_keep_alive() -> Duration {
    Duration::from_secs(15)
}
