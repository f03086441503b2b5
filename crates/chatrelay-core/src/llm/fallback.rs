//! Multi-provider fallback chain.
//!
//! Routes a completion request through the configured providers in fixed
//! priority order. In [`FallbackMode::Fallback`] any failure (no usable reply,
//! quota exceeded, timeout) advances to the next provider and the first
//! success wins. In [`FallbackMode::Single`] only the first provider is
//! called. Each provider gets exactly one attempt per request, and earlier
//! providers are never revisited.

use std::time::Instant;

use dashmap::DashMap;

use chatrelay_types::llm::{
    CompletionRequest, FallbackMode, LlmError, ProviderResult, ProviderStatusInfo,
};

use super::box_provider::BoxLlmProvider;
use super::health::ProviderHealth;

/// Result of a successful completion through the fallback chain.
#[derive(Debug, Clone)]
pub struct FallbackResult {
    /// Trimmed, non-empty reply text.
    pub reply: String,
    /// Name of the provider that handled the request.
    pub provider_name: String,
    /// Number of providers called, including the successful one.
    pub attempts: usize,
    /// Set when a non-primary provider handled the request.
    pub failover_warning: Option<String>,
}

/// Ordered list of provider adapters with per-provider call statistics.
///
/// Usable through `&self` so concurrent requests never serialize on the chain;
/// statistics live in a `DashMap` keyed by provider name.
pub struct FallbackChain {
    providers: Vec<BoxLlmProvider>,
    health: DashMap<String, ProviderHealth>,
    mode: FallbackMode,
}

impl FallbackChain {
    /// Create a chain. `providers` is in priority order (index 0 is primary).
    pub fn new(mode: FallbackMode, providers: Vec<BoxLlmProvider>) -> Self {
        let health = DashMap::new();
        for provider in &providers {
            health.insert(
                provider.name().to_string(),
                ProviderHealth::new(provider.name(), provider.model()),
            );
        }

        Self {
            providers,
            health,
            mode,
        }
    }

    pub fn mode(&self) -> FallbackMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Provider names in priority order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Name of the primary (highest priority) provider.
    pub fn primary_provider_name(&self) -> Option<&str> {
        self.providers.first().map(|p| p.name())
    }

    /// Call statistics for every provider, in priority order.
    pub fn health_status(&self) -> Vec<ProviderStatusInfo> {
        self.providers
            .iter()
            .filter_map(|p| self.health.get(p.name()).map(|h| h.to_status_info()))
            .collect()
    }

    /// Providers eligible for this request under the current mode.
    fn candidates(&self) -> &[BoxLlmProvider] {
        match self.mode {
            FallbackMode::Single => &self.providers[..self.providers.len().min(1)],
            FallbackMode::Fallback => &self.providers,
        }
    }

    fn build_failover_warning(&self, used_provider: &str) -> Option<String> {
        match self.primary_provider_name() {
            Some(primary) if primary != used_provider => {
                Some(format!("Switched from {primary} to {used_provider}"))
            }
            _ => None,
        }
    }

    /// Send a completion request through the chain.
    ///
    /// Returns the first usable reply, or the error from the last provider
    /// called when every candidate failed.
    pub async fn complete(&self, request: &CompletionRequest) -> Result<FallbackResult, LlmError> {
        let mut last_error: Option<LlmError> = None;
        let mut attempts = 0;

        for provider in self.candidates() {
            let provider_name = provider.name().to_string();
            attempts += 1;

            let start = Instant::now();
            let outcome = provider.send(request).await;
            let latency_ms = start.elapsed().as_millis() as u64;

            match outcome {
                ProviderResult::Success { reply } => {
                    if let Some(mut health) = self.health.get_mut(&provider_name) {
                        health.record_success(latency_ms);
                    }

                    let failover_warning = self.build_failover_warning(&provider_name);
                    if let Some(ref warning) = failover_warning {
                        tracing::warn!(%warning, "Failover occurred");
                    }
                    tracing::debug!(provider = %provider_name, latency_ms, "Provider replied");

                    return Ok(FallbackResult {
                        reply,
                        provider_name,
                        attempts,
                        failover_warning,
                    });
                }
                ProviderResult::Failure { error, retryable } => {
                    if let Some(mut health) = self.health.get_mut(&provider_name) {
                        health.record_failure(&error, latency_ms);
                    }

                    tracing::warn!(
                        provider = %provider_name,
                        error = %error,
                        quota = error.is_quota(),
                        retryable,
                        latency_ms,
                        "Provider call failed"
                    );
                    last_error = Some(error);
                }
            }
        }

        Err(last_error.unwrap_or(LlmError::Provider {
            message: "no providers configured".to_string(),
        }))
    }
}
