//! Infrastructure layer for chatrelay.
//!
//! Implements the traits defined in `chatrelay-core` against the outside
//! world: the reqwest OpenAI-compatible provider, the HTTP transport used by
//! the client relay, env/`.env` secret lookup, and TOML config loading.

pub mod config;
pub mod llm;
pub mod relay;
pub mod secret;
