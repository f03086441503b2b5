//! Gateway and client relay logic for chatrelay.
//!
//! Depends only on `chatrelay-types`. Network adapters (the reqwest provider
//! and HTTP transport) implement the traits defined here and live in
//! `chatrelay-infra`.

pub mod chat;
pub mod llm;
pub mod relay;
