//! LLM provider implementations.
//!
//! Contains the OpenAI-compatible [`LlmProvider`] adapter plus the factory
//! ([`create_provider`]) that builds one from a [`ProviderConfig`], and
//! [`build_fallback_chain`] which wires every enabled provider into the
//! gateway's chain in config order.
//!
//! [`LlmProvider`]: chatrelay_core::llm::provider::LlmProvider

pub mod openai_compat;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use chatrelay_core::llm::box_provider::BoxLlmProvider;
use chatrelay_core::llm::fallback::FallbackChain;
use chatrelay_types::config::RelayConfig;
use chatrelay_types::llm::{LlmError, ProviderConfig};

use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::{OpenAiCompatConfig, default_base_url, key_format_warning};
use crate::secret::EnvSecretProvider;

/// Show only the first and last four characters of a key.
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Log whether a provider's key is present, masked, and warn on odd formats.
fn log_key_status(config: &ProviderConfig, env_var: &str, api_key: Option<&SecretString>) {
    match api_key {
        Some(key) => {
            let key = key.expose_secret();
            tracing::info!(
                provider = %config.name,
                env_var,
                key = %mask_api_key(key),
                "API key loaded"
            );
            if let Some(warning) = key_format_warning(&config.name, key) {
                tracing::warn!(provider = %config.name, "{warning}");
            }
        }
        None => tracing::warn!(
            provider = %config.name,
            env_var,
            "API key NOT SET, calls to this provider will fail"
        ),
    }
}

/// Create a [`BoxLlmProvider`] from a [`ProviderConfig`].
///
/// A missing API key is not an error here: the provider is still built and
/// every call fails with `MissingApiKey`, so the chain can fall through.
pub fn create_provider(
    config: &ProviderConfig,
    secrets: &EnvSecretProvider,
) -> Result<BoxLlmProvider, LlmError> {
    let env_var = config.api_key_env_var();
    let api_key = secrets.get(&env_var);
    log_key_status(config, &env_var, api_key.as_ref());

    let base_url = config
        .base_url
        .clone()
        .unwrap_or_else(|| default_base_url(&config.name).to_string());

    let provider = OpenAiCompatibleProvider::new(OpenAiCompatConfig {
        provider_name: config.name.clone(),
        base_url,
        api_key,
        api_key_env: env_var,
        model: config.model.clone(),
        timeout: Duration::from_secs(config.timeout_secs),
    })?;
    Ok(BoxLlmProvider::new(provider))
}

/// Build the gateway's fallback chain from every enabled provider, in order.
pub fn build_fallback_chain(
    config: &RelayConfig,
    secrets: &EnvSecretProvider,
) -> Result<FallbackChain, LlmError> {
    let providers = config
        .enabled_providers()
        .map(|p| create_provider(p, secrets))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::info!(
        mode = %config.gateway.mode,
        providers = providers.len(),
        "Provider chain ready"
    );
    Ok(FallbackChain::new(config.gateway.mode, providers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatrelay_types::llm::FallbackMode;

    fn provider_config(name: &str, enabled: bool) -> ProviderConfig {
        ProviderConfig {
            name: name.to_string(),
            base_url: None,
            model: "some-model".to_string(),
            api_key_env: Some("CHATRELAY_TEST_UNSET_KEY".to_string()),
            timeout_secs: 10,
            enabled,
        }
    }

    #[test]
    fn test_mask_api_key() {
        assert_eq!(mask_api_key("sk-or-v1-abcdef123456"), "sk-o...3456");
        assert_eq!(mask_api_key("short"), "****");
    }

    #[test]
    fn test_create_provider_without_key() {
        let provider =
            create_provider(&provider_config("openrouter", true), &EnvSecretProvider).unwrap();
        assert_eq!(provider.name(), "openrouter");
        assert_eq!(provider.model(), "some-model");
    }

    #[tokio::test]
    async fn test_provider_without_key_fails_with_missing_key() {
        let provider =
            create_provider(&provider_config("openrouter", true), &EnvSecretProvider).unwrap();
        let request = chatrelay_types::llm::CompletionRequest {
            model: String::new(),
            messages: vec![chatrelay_types::llm::Message::user("hi")],
        };
        let err = provider.complete(&request).await.unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey { .. }));
    }

    #[test]
    fn test_build_chain_skips_disabled() {
        let mut config = RelayConfig::default();
        config.gateway.mode = FallbackMode::Single;
        config.providers = vec![
            provider_config("openrouter", true),
            provider_config("openai", false),
            provider_config("mistral", true),
        ];

        let chain = build_fallback_chain(&config, &EnvSecretProvider).unwrap();
        assert_eq!(chain.provider_names(), vec!["openrouter", "mistral"]);
        assert_eq!(chain.mode(), FallbackMode::Single);
    }
}
