//! Configuration for identity service module

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Identity service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// How long an invitation stays acceptable
    #[serde(default = "default_invitation_ttl", with = "humantime_serde")]
    pub invitation_ttl: Duration,

    /// Minimum password length accepted at registration
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,

    /// Promote the very first registered account to platform admin
    #[serde(default = "default_true")]
    pub first_user_is_admin: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            invitation_ttl: default_invitation_ttl(),
            min_password_length: default_min_password_length(),
            first_user_is_admin: true,
        }
    }
}

fn default_invitation_ttl() -> Duration {
    Duration::from_secs(7 * 24 * 60 * 60)
}

fn default_min_password_length() -> usize {
    8
}

fn default_true() -> bool {
    true
}
