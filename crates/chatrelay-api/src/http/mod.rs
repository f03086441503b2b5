//! HTTP layer for the backend gateway.
//!
//! `POST /message` and `GET /health`, plain `{reply}` / `{error}` JSON
//! bodies, CORS open to any origin.

pub mod error;
pub mod handlers;
pub mod router;
