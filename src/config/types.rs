use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Behaviour of the stub profile backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Lower bound of the simulated fetch latency (default: 250).
    #[serde(default = "default_min_latency_ms")]
    pub min_latency_ms: u64,
    /// Upper bound of the simulated fetch latency (default: 3000).
    #[serde(default = "default_max_latency_ms")]
    pub max_latency_ms: u64,
    /// Fail the first fetch with a network error (default: true).
    #[serde(default = "default_fail_first_fetch")]
    pub fail_first_fetch: bool,
    #[serde(default = "default_email_update_min_ms")]
    pub email_update_min_ms: u64,
    #[serde(default = "default_email_update_max_ms")]
    pub email_update_max_ms: u64,
}

/// Per-session settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Request the profile as soon as the session is activated (default: true).
    #[serde(default = "default_initial_load")]
    pub initial_load: bool,
}

fn default_min_latency_ms() -> u64 {
    250
}

fn default_max_latency_ms() -> u64 {
    3000
}

fn default_fail_first_fetch() -> bool {
    true
}

fn default_email_update_min_ms() -> u64 {
    1000
}

fn default_email_update_max_ms() -> u64 {
    2000
}

fn default_initial_load() -> bool {
    true
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            min_latency_ms: default_min_latency_ms(),
            max_latency_ms: default_max_latency_ms(),
            fail_first_fetch: default_fail_first_fetch(),
            email_update_min_ms: default_email_update_min_ms(),
            email_update_max_ms: default_email_update_max_ms(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_load: default_initial_load(),
        }
    }
}
