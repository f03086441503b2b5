//! Configuration and per-provider defaults for OpenAI-compatible providers.
//!
//! Every provider chatrelay talks to speaks the chat completions protocol;
//! they differ only by base URL, credentials and model.

use std::time::Duration;

use secrecy::SecretString;

/// Configuration for one OpenAI-compatible provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openrouter", "openai").
    pub provider_name: String,
    /// Base URL without the `/chat/completions` suffix.
    pub base_url: String,
    /// Bearer token. `None` makes every call fail with `MissingApiKey`.
    pub api_key: Option<SecretString>,
    /// Environment variable the key was expected in, for error messages.
    pub api_key_env: String,
    pub model: String,
    /// Upper bound on a single upstream call.
    pub timeout: Duration,
}

pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const MISTRAL_BASE_URL: &str = "https://api.mistral.ai/v1";
pub const GLM_BASE_URL: &str = "https://api.z.ai/api/paas/v4";

/// Base URL for a well-known provider name. Unknown names get OpenAI's.
pub fn default_base_url(provider_name: &str) -> &'static str {
    match provider_name.to_lowercase().as_str() {
        "openrouter" => OPENROUTER_BASE_URL,
        "gemini" => GEMINI_BASE_URL,
        "mistral" => MISTRAL_BASE_URL,
        "glm" => GLM_BASE_URL,
        _ => OPENAI_BASE_URL,
    }
}

/// Warn about keys that are obviously for a different service.
///
/// Only OpenRouter has a recognisable prefix (`sk-or-v1-`).
pub fn key_format_warning(provider_name: &str, api_key: &str) -> Option<String> {
    if provider_name.eq_ignore_ascii_case("openrouter") && !api_key.starts_with("sk-or-v1-") {
        return Some(
            "OpenRouter API key format may be incorrect. Should start with \"sk-or-v1-\""
                .to_string(),
        );
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_urls() {
        assert_eq!(default_base_url("openrouter"), OPENROUTER_BASE_URL);
        assert_eq!(default_base_url("OpenRouter"), OPENROUTER_BASE_URL);
        assert_eq!(default_base_url("gemini"), GEMINI_BASE_URL);
        assert_eq!(default_base_url("mistral"), MISTRAL_BASE_URL);
        assert_eq!(default_base_url("glm"), GLM_BASE_URL);
        assert_eq!(default_base_url("openai"), OPENAI_BASE_URL);
        assert_eq!(default_base_url("something-else"), OPENAI_BASE_URL);
    }

    #[test]
    fn test_openrouter_key_format() {
        assert!(key_format_warning("openrouter", "sk-or-v1-abc").is_none());
        assert!(key_format_warning("openrouter", "sk-proj-abc").is_some());
        assert!(key_format_warning("openai", "sk-proj-abc").is_none());
    }
}
