//! Application state shared by the HTTP handlers.
//!
//! The gateway owns the conversation memory and the provider chain; handlers
//! only ever reach it through `Arc`, so cloning `AppState` per request is cheap.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chatrelay_core::chat::gateway::ChatGateway;
use chatrelay_infra::llm::build_fallback_chain;
use chatrelay_infra::secret::EnvSecretProvider;
use chatrelay_types::config::RelayConfig;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<ChatGateway>,
    /// Static files served for unmatched paths, when the directory exists.
    pub public_dir: Option<PathBuf>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(gateway: ChatGateway, public_dir: Option<PathBuf>) -> Self {
        Self {
            gateway: Arc::new(gateway),
            public_dir,
            started_at: Instant::now(),
        }
    }

    /// Wire the provider chain and gateway from configuration.
    pub async fn init(config: &RelayConfig) -> anyhow::Result<Self> {
        let chain = build_fallback_chain(config, &EnvSecretProvider::new())?;
        let gateway = ChatGateway::new(chain, &config.gateway);

        let public_dir = PathBuf::from(&config.server.public_dir);
        let public_dir = if tokio::fs::try_exists(&public_dir).await.unwrap_or(false) {
            Some(public_dir)
        } else {
            tracing::debug!(
                path = %public_dir.display(),
                "Public directory not found, serving API only"
            );
            None
        };

        Ok(Self::new(gateway, public_dir))
    }
}
