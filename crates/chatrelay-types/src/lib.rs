//! Shared domain types for chatrelay.
//!
//! Conversation turns, upstream request/response shapes, the `/message` wire
//! format, configuration, and the error taxonomy shared by the gateway and
//! the client relay.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
