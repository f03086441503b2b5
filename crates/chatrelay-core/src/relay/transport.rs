use std::future::Future;

use chatrelay_types::error::RelayError;

/// Carries one user message to the backend gateway and returns its reply.
///
/// The HTTP implementation lives in `chatrelay-infra`; tests use scripted
/// in-memory transports.
pub trait GatewayTransport: Send + Sync {
    fn send(&self, message: &str) -> impl Future<Output = Result<String, RelayError>> + Send;
}
