//! Configuration types for chatrelay.
//!
//! `RelayConfig` represents the top-level `chatrelay.toml` covering the HTTP
//! server, the gateway's memory and provider policy, the provider list, and
//! the client relay's retry behaviour.

use serde::{Deserialize, Serialize};

use crate::llm::{FallbackMode, ProviderConfig};

/// Top-level configuration. Every field has a default, so an empty file is
/// a valid config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Providers in priority order.
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderConfig>,

    #[serde(default)]
    pub client: ClientConfig,
}

fn default_providers() -> Vec<ProviderConfig> {
    vec![ProviderConfig::openrouter_default()]
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            gateway: GatewayConfig::default(),
            providers: default_providers(),
            client: ClientConfig::default(),
        }
    }
}

impl RelayConfig {
    /// Providers that take part in the chain, in priority order.
    pub fn enabled_providers(&self) -> impl Iterator<Item = &ProviderConfig> {
        self.providers.iter().filter(|p| p.enabled)
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served verbatim as the router fallback.
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_public_dir() -> String {
    "public".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_dir: default_public_dir(),
        }
    }
}

/// Backend gateway settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Number of user/assistant exchanges kept as short-term memory.
    #[serde(default = "default_max_history")]
    pub max_history: usize,

    #[serde(default)]
    pub mode: FallbackMode,

    /// Bot name used until the user assigns one.
    #[serde(default = "default_bot_name")]
    pub default_bot_name: String,
}

fn default_max_history() -> usize {
    5
}

fn default_bot_name() -> String {
    "Assistant".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            max_history: default_max_history(),
            mode: FallbackMode::default(),
            default_bot_name: default_bot_name(),
        }
    }
}

/// Client relay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the gateway (without the `/message` path).
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,

    /// Additional attempts after the first failed send.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before retry `n` is `n * retry_base_delay_ms`.
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
}

fn default_gateway_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_base_delay_ms() -> u64 {
    1000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            gateway_url: default_gateway_url(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_config_default_values() {
        let config = RelayConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.gateway.max_history, 5);
        assert_eq!(config.gateway.mode, FallbackMode::Fallback);
        assert_eq!(config.gateway.default_bot_name, "Assistant");
        assert_eq!(config.providers.len(), 1);
        assert_eq!(config.providers[0].name, "openrouter");
        assert_eq!(config.client.max_retries, 2);
        assert_eq!(config.client.retry_base_delay_ms, 1000);
    }

    #[test]
    fn test_relay_config_deserialize_empty() {
        let config: RelayConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.providers.len(), 1);
    }

    #[test]
    fn test_relay_config_deserialize_with_values() {
        let toml_str = r#"
[server]
port = 8080

[gateway]
max_history = 3
mode = "single"

[[providers]]
name = "openrouter"
model = "anthropic/claude-3-haiku"

[[providers]]
name = "openai"
base_url = "https://api.openai.com/v1"
model = "gpt-4o-mini"
timeout_secs = 20
enabled = false
"#;
        let config: RelayConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.public_dir, "public");
        assert_eq!(config.gateway.max_history, 3);
        assert_eq!(config.gateway.mode, FallbackMode::Single);
        assert_eq!(config.providers.len(), 2);
        assert_eq!(config.providers[1].timeout_secs, 20);
        assert_eq!(config.enabled_providers().count(), 1);
    }
}
