//! LLM provider abstractions for chatrelay.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider adapters
//! - `BoxLlmProvider`: Object-safe wrapper for dynamic dispatch
//! - `FallbackChain`: ordered provider list with single/fallback selection

pub mod box_provider;
pub mod fallback;
pub mod health;
pub mod provider;
