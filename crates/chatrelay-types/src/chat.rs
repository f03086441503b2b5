//! Wire types for the `/message` endpoint.
//!
//! The same shapes are used by the axum handler (server side) and by the
//! client relay's HTTP transport (client side).

use serde::{Deserialize, Serialize};

/// Request body for `POST /message`.
///
/// `message` is optional at the serde level so a missing field reaches the
/// gateway's validation instead of failing deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageRequest {
    #[serde(default)]
    pub message: Option<String>,
}

impl MessageRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

/// Success body: `200 {"reply": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReply {
    pub reply: String,
}

/// Error body: `{"error": "..."}` with a 4xx/5xx status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Lenient view of any `/message` response, used by clients that must cope
/// with a body carrying neither field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
