//! Configuration loader using Figment for layered config management.
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. TOML config file
//! 3. Environment variables (LUMEN_* prefix)

use crate::foundation::{AnchorError, Result};
use crate::infrastructure::config::types::AppConfig;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use log::{debug, info};
use std::path::Path;

const CONFIG_FILE_NAME: &str = "lumen-config.toml";

/// Environment variable prefix for config overrides.
///
/// Example: `LUMEN_SERVICE__API_BASE_URL` -> `service.api_base_url`
const ENV_PREFIX: &str = "LUMEN_";

/// Load configuration from the default file in `data_dir` (`lumen-config.toml`).
pub fn load_config(data_dir: &Path) -> Result<AppConfig> {
    let config_path = data_dir.join(CONFIG_FILE_NAME);
    load_config_from_file(&config_path)
}

/// Load configuration from a specific file path. The file may be absent;
/// defaults and environment overrides still apply.
pub fn load_config_from_file(path: &Path) -> Result<AppConfig> {
    info!("loading configuration path={}", path.display());
    let figment = Figment::from(Serialized::defaults(AppConfig::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));
    let config: AppConfig =
        figment.extract().map_err(|err| AnchorError::ConfigError(format!("config extraction failed: {err}")))?;
    validate(&config)?;
    debug!(
        "configuration loaded api_base_url_set={} poll_interval_secs={} max_tracked_secs={}",
        !config.service.api_base_url.trim().is_empty(),
        config.flows.poll_interval_seconds,
        config.flows.max_tracked_seconds
    );
    Ok(config)
}

fn validate(config: &AppConfig) -> Result<()> {
    if config.flows.poll_interval_seconds == 0 {
        return Err(AnchorError::ConfigError("flows.poll_interval_seconds must be at least 1".to_string()));
    }
    if config.flows.max_tracked_seconds <= config.flows.poll_interval_seconds {
        return Err(AnchorError::ConfigError(
            "flows.max_tracked_seconds must exceed flows.poll_interval_seconds".to_string(),
        ));
    }
    if config.flows.http_timeout_seconds == 0 {
        return Err(AnchorError::ConfigError("flows.http_timeout_seconds must be at least 1".to_string()));
    }
    Ok(())
}
