//! LLM request/response types for chatrelay.
//!
//! These types model the data shapes for upstream provider interactions:
//! conversation turns, completion requests, per-provider outcomes, and the
//! error kinds the fallback chain classifies.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a message in an LLM conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single message in an LLM conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// One exchanged message with an assigned role. Insertion order is
/// chronological order.
pub type ConversationTurn = Message;

/// Request to an upstream provider for a chat completion.
///
/// Serializes to the OpenAI-style `{model, messages}` body. An empty `model`
/// means "use the provider's configured model".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
}

/// Response from an upstream provider for a non-streaming completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub content: String,
    pub model: String,
}

/// Errors from upstream provider calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LlmError {
    /// HTTP 429, or an error payload mentioning balance/credit/insufficient funds.
    #[error("quota exceeded: {message}")]
    QuotaExceeded { message: String },

    #[error("request timed out after {after_secs}s")]
    Timeout { after_secs: u64 },

    /// HTTP 404 from the completions endpoint.
    #[error("model not found: {model}")]
    ModelNotFound { model: String },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("API key not set (expected in ${env_var})")]
    MissingApiKey { env_var: String },

    #[error("provider returned an empty reply")]
    EmptyReply,

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("provider error: {message}")]
    Provider { message: String },
}

impl LlmError {
    /// Whether this error is the quota-exceeded kind (distinct from generic failure).
    pub fn is_quota(&self) -> bool {
        matches!(self, LlmError::QuotaExceeded { .. })
    }

    /// Whether a later attempt of the same request could plausibly succeed.
    ///
    /// Quota, unknown model and credential problems are not fixed by retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::Timeout { .. }
                | LlmError::EmptyReply
                | LlmError::Deserialization(..)
                | LlmError::Provider { .. }
        )
    }
}

/// Tagged outcome of a single provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderResult {
    Success { reply: String },
    Failure { error: LlmError, retryable: bool },
}

impl From<Result<CompletionResponse, LlmError>> for ProviderResult {
    /// A missing or whitespace-only reply is never a success.
    fn from(result: Result<CompletionResponse, LlmError>) -> Self {
        let error = match result {
            Ok(response) => {
                let reply = response.content.trim();
                if !reply.is_empty() {
                    return ProviderResult::Success {
                        reply: reply.to_string(),
                    };
                }
                LlmError::EmptyReply
            }
            Err(err) => err,
        };
        let retryable = error.is_retryable();
        ProviderResult::Failure { error, retryable }
    }
}

/// How the gateway picks providers from the configured list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackMode {
    /// Call the first enabled provider only.
    Single,
    /// Call providers in list order until one succeeds.
    #[default]
    Fallback,
}

impl fmt::Display for FallbackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackMode::Single => write!(f, "single"),
            FallbackMode::Fallback => write!(f, "fallback"),
        }
    }
}

/// Configuration for a single upstream provider.
///
/// Providers are tried in the order they appear in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Human-readable name (e.g., "openrouter", "openai").
    pub name: String,
    /// Override the default base URL for the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Model identifier to use.
    pub model: String,
    /// Environment variable holding the bearer token. Defaults to
    /// `{NAME}_API_KEY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    /// Upper bound on a single upstream call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Whether this provider takes part in the chain.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_enabled() -> bool {
    true
}

impl ProviderConfig {
    /// The environment variable the API key is read from.
    pub fn api_key_env_var(&self) -> String {
        self.api_key_env.clone().unwrap_or_else(|| {
            format!("{}_API_KEY", self.name.to_uppercase().replace(['-', ' '], "_"))
        })
    }

    /// OpenRouter running Claude 3 Haiku, the out-of-the-box provider.
    pub fn openrouter_default() -> Self {
        Self {
            name: "openrouter".to_string(),
            base_url: None,
            model: "anthropic/claude-3-haiku".to_string(),
            api_key_env: Some("OPENROUTER_API_KEY".to_string()),
            timeout_secs: default_timeout_secs(),
            enabled: true,
        }
    }
}

/// Status information for a provider in the chain (for `GET /health`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderStatusInfo {
    pub name: String,
    pub model: String,
    pub last_error: Option<String>,
    /// RFC 3339 timestamp of the last successful call.
    pub last_success_at: Option<String>,
    pub last_latency_ms: Option<u64>,
    pub total_calls: u64,
    pub total_failures: u64,
    pub total_quota_exceeded: u64,
}
