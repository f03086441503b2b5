//! LlmProvider trait definition.
//!
//! This is the core abstraction that every upstream provider adapter
//! implements. Uses RPITIT for `complete`; see [`super::box_provider`] for the
//! object-safe wrapper the fallback chain stores.

use chatrelay_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for upstream LLM provider backends (OpenRouter, OpenAI, ...).
///
/// Implementations live in chatrelay-infra (e.g., `OpenAiCompatibleProvider`).
/// A call is a single attempt: implementations never retry internally.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openrouter").
    fn name(&self) -> &str;

    /// Model used when the request leaves `model` empty.
    fn model(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
