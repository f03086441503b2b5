use thiserror::Error;

use crate::llm::LlmError;

/// Client-facing message for quota-exceeded failures.
pub const QUOTA_EXCEEDED_MESSAGE: &str =
    "AI service quota exceeded. Please try again later or check your plan.";

/// Client-facing message for upstream provider failures.
pub const PROVIDER_FAILED_MESSAGE: &str = "AI service failed. Please try again later.";

/// Client-facing message for anything unexpected inside the gateway.
pub const UNEXPECTED_ERROR_MESSAGE: &str =
    "An unexpected error occurred. Please try again later.";

/// Errors from the backend gateway's message path.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Empty or malformed input. Never reaches an upstream call.
    #[error("{0}")]
    Validation(String),

    /// Upstream rate or credit limit.
    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Network failure, timeout, malformed or empty reply.
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Uncaught internal failure. Detail is logged, never sent to clients.
    #[error("unexpected error: {0}")]
    Unknown(String),
}

impl GatewayError {
    /// HTTP status code this error maps to.
    pub fn status_code(&self) -> u16 {
        match self {
            GatewayError::Validation(_) => 400,
            GatewayError::QuotaExceeded(_) => 429,
            GatewayError::ProviderUnavailable(_) | GatewayError::Unknown(_) => 500,
        }
    }

    /// The message placed in the `{error}` response body.
    pub fn client_message(&self) -> String {
        match self {
            GatewayError::Validation(msg) => msg.clone(),
            GatewayError::QuotaExceeded(_) => QUOTA_EXCEEDED_MESSAGE.to_string(),
            GatewayError::ProviderUnavailable(_) => PROVIDER_FAILED_MESSAGE.to_string(),
            GatewayError::Unknown(_) => UNEXPECTED_ERROR_MESSAGE.to_string(),
        }
    }
}

impl From<LlmError> for GatewayError {
    fn from(err: LlmError) -> Self {
        if err.is_quota() {
            GatewayError::QuotaExceeded(err.to_string())
        } else {
            GatewayError::ProviderUnavailable(err.to_string())
        }
    }
}

/// Errors seen by the client relay when talking to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// The gateway could not be reached at all.
    #[error("network error: {0}")]
    Network(String),

    /// HTTP 429 carrying the server-provided message.
    #[error("{0}")]
    QuotaExceeded(String),

    /// Any 5xx response.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Any other non-success response (400 and friends).
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
}

impl RelayError {
    /// Network errors and non-quota server errors are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RelayError::Network(_) | RelayError::Server { .. })
    }

    /// Classify a non-success HTTP status and its `{error}` message.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            429 => RelayError::QuotaExceeded(message),
            500..=599 => RelayError::Server { status, message },
            _ => RelayError::Rejected { status, message },
        }
    }
}

/// Errors from loading or validating relay configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid config: {0}")]
    Invalid(String),
}
