use crate::foundation::constants::{
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_MAX_TRACKED_SECS, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_STARTUP_PROBE_GRACE_MS,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Base configuration for the engine.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Network label: pubnet, testnet. Informational; endpoints come from `api_base_url`.
    #[serde(default)]
    pub network: Option<String>,
    /// Gateway that proxies the per-anchor endpoints.
    #[serde(default)]
    pub api_base_url: String,
    /// Directory holding the persisted session record and log files.
    #[serde(default)]
    pub data_dir: String,
    /// Optional directory for log files; console-only when unset.
    #[serde(default)]
    pub log_dir: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Seconds between status polls for each tracked flow.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Wall-clock cap on polling per flow, from launch.
    #[serde(default = "default_max_tracked")]
    pub max_tracked_seconds: u64,
    /// Timeout for every anchor HTTP call.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// Delay before the startup capability re-probe.
    #[serde(default = "default_probe_grace")]
    pub startup_probe_grace_ms: u64,
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

fn default_max_tracked() -> u64 {
    DEFAULT_MAX_TRACKED_SECS
}

fn default_http_timeout() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

fn default_probe_grace() -> u64 {
    DEFAULT_STARTUP_PROBE_GRACE_MS
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: default_poll_interval(),
            max_tracked_seconds: default_max_tracked(),
            http_timeout_seconds: default_http_timeout(),
            startup_probe_grace_ms: default_probe_grace(),
        }
    }
}

impl FlowConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }

    pub fn startup_probe_grace(&self) -> Duration {
        Duration::from_millis(self.startup_probe_grace_ms)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub flows: FlowConfig,
}
