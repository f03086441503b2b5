//! Relay configuration loader.
//!
//! Reads `chatrelay.toml` and deserializes it into [`RelayConfig`]. Falls
//! back to defaults when the file is missing or malformed, so the server
//! always starts.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chatrelay_types::config::RelayConfig;
use chatrelay_types::error::ConfigError;

/// Config file used when neither `--config` nor `CHATRELAY_CONFIG` is given.
pub const DEFAULT_CONFIG_FILE: &str = "chatrelay.toml";

/// Environment variable naming an alternate config file.
pub const CONFIG_ENV_VAR: &str = "CHATRELAY_CONFIG";

/// Pick the config path: explicit flag, then `CHATRELAY_CONFIG`, then
/// `./chatrelay.toml`.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match std::env::var(CONFIG_ENV_VAR) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_CONFIG_FILE),
    }
}

/// Read and parse a config file, reporting what went wrong.
pub async fn read_relay_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    toml::from_str::<RelayConfig>(&content).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Load relay configuration from `path`.
///
/// - Missing file: [`RelayConfig::default()`], logged at debug.
/// - Unreadable or malformed file: default, with a warning.
pub async fn load_relay_config(path: &Path) -> RelayConfig {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        tracing::debug!("No config found at {}, using defaults", path.display());
        return RelayConfig::default();
    }

    match read_relay_config(path).await {
        Ok(config) => {
            tracing::debug!("Loaded config from {}", path.display());
            config
        }
        Err(err) => {
            tracing::warn!("{err}, using defaults");
            RelayConfig::default()
        }
    }
}

/// Reject configs the gateway cannot run with.
pub fn validate_relay_config(config: &RelayConfig) -> Result<(), ConfigError> {
    if config.enabled_providers().next().is_none() {
        return Err(ConfigError::Invalid(
            "at least one enabled provider is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for provider in &config.providers {
        if provider.name.trim().is_empty() {
            return Err(ConfigError::Invalid("provider name cannot be empty".to_string()));
        }
        if !seen.insert(provider.name.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "duplicate provider name '{}'",
                provider.name
            )));
        }
        if provider.timeout_secs == 0 {
            return Err(ConfigError::Invalid(format!(
                "provider '{}' timeout_secs must be greater than zero",
                provider.name
            )));
        }
    }

    Ok(())
}
