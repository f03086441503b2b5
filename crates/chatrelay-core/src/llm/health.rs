//! Per-provider call statistics for the fallback chain.
//!
//! The chain never skips a provider based on these numbers; every request
//! walks the configured order. They exist for `GET /health` and for logs.

use chrono::{DateTime, Utc};

use chatrelay_types::llm::{LlmError, ProviderStatusInfo};

/// Call statistics for a single provider.
#[derive(Debug, Clone)]
pub struct ProviderHealth {
    /// Provider name (matches `ProviderConfig.name`).
    pub name: String,
    /// Model the provider is configured with.
    pub model: String,
    /// Last error message from this provider.
    pub last_error: Option<String>,
    /// When this provider last succeeded.
    pub last_success: Option<DateTime<Utc>>,
    /// Latency of the last call in milliseconds.
    pub last_latency_ms: Option<u64>,
    pub total_calls: u64,
    pub total_failures: u64,
    pub total_quota_exceeded: u64,
}

impl ProviderHealth {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            last_error: None,
            last_success: None,
            last_latency_ms: None,
            total_calls: 0,
            total_failures: 0,
            total_quota_exceeded: 0,
        }
    }

    /// Record a successful call to this provider.
    pub fn record_success(&mut self, latency_ms: u64) {
        self.total_calls += 1;
        self.last_success = Some(Utc::now());
        self.last_latency_ms = Some(latency_ms);
    }

    /// Record a failed call to this provider.
    pub fn record_failure(&mut self, error: &LlmError, latency_ms: u64) {
        self.total_calls += 1;
        self.total_failures += 1;
        if error.is_quota() {
            self.total_quota_exceeded += 1;
        }
        self.last_error = Some(error.to_string());
        self.last_latency_ms = Some(latency_ms);
    }

    pub fn to_status_info(&self) -> ProviderStatusInfo {
        ProviderStatusInfo {
            name: self.name.clone(),
            model: self.model.clone(),
            last_error: self.last_error.clone(),
            last_success_at: self.last_success.map(|t| t.to_rfc3339()),
            last_latency_ms: self.last_latency_ms,
            total_calls: self.total_calls,
            total_failures: self.total_failures,
            total_quota_exceeded: self.total_quota_exceeded,
        }
    }
}
