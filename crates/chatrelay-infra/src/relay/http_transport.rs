//! `POST /message` over HTTP.

use chatrelay_core::relay::client::NO_REPLY_TEXT;
use chatrelay_core::relay::transport::GatewayTransport;
use chatrelay_types::chat::{MessageRequest, MessageResponse};
use chatrelay_types::error::RelayError;

/// Sends user messages to a running gateway with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpGatewayTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpGatewayTransport {
    /// `gateway_url` is the server root, e.g. `http://127.0.0.1:3000`.
    pub fn new(gateway_url: &str) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| RelayError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/message", gateway_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl GatewayTransport for HttpGatewayTransport {
    async fn send(&self, message: &str) -> Result<String, RelayError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&MessageRequest::new(message))
            .send()
            .await
            .map_err(|e| RelayError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RelayError::Network(e.to_string()))?;
        let parsed: MessageResponse = serde_json::from_str(&body).unwrap_or_default();

        if !status.is_success() {
            return Err(RelayError::from_status(
                status.as_u16(),
                parsed.error.unwrap_or_default(),
            ));
        }

        Ok(parsed
            .reply
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| NO_REPLY_TEXT.to_string()))
    }
}
