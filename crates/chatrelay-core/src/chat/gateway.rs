//! Backend gateway service.
//!
//! `ChatGateway` owns the process-wide conversation state (history and bot
//! identity) and the provider fallback chain. The HTTP layer calls
//! [`ChatGateway::handle_message`] once per `POST /message`.
//!
//! The state mutex is taken twice per request: once to apply name detection
//! and snapshot the prompt inputs, and once to append the finished exchange.
//! It is never held across the upstream call.

use tokio::sync::Mutex;

use chatrelay_types::config::GatewayConfig;
use chatrelay_types::error::GatewayError;
use chatrelay_types::llm::{ConversationTurn, FallbackMode, ProviderStatusInfo};

use super::history::ConversationHistory;
use super::identity::{BotIdentity, detect_bot_name};
use super::prompt::build_request;
use crate::llm::fallback::FallbackChain;

/// Client-facing message for an empty or missing `message` field.
pub const NO_MESSAGE_PROVIDED: &str = "No message provided.";

/// Shared mutable state of the single global conversation.
#[derive(Debug)]
pub struct ConversationState {
    pub history: ConversationHistory,
    pub identity: BotIdentity,
}

impl ConversationState {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            history: ConversationHistory::new(config.max_history),
            identity: BotIdentity::new(&config.default_bot_name),
        }
    }
}

pub struct ChatGateway {
    chain: FallbackChain,
    state: Mutex<ConversationState>,
}

impl ChatGateway {
    pub fn new(chain: FallbackChain, config: &GatewayConfig) -> Self {
        Self {
            chain,
            state: Mutex::new(ConversationState::new(config)),
        }
    }

    pub fn mode(&self) -> FallbackMode {
        self.chain.mode()
    }

    /// Handle one user message end to end.
    ///
    /// Empty input is rejected before any upstream call. On success the
    /// exchange is appended to history and the trimmed reply returned; on
    /// failure history is left untouched.
    pub async fn handle_message(&self, user_message: &str) -> Result<String, GatewayError> {
        if user_message.trim().is_empty() {
            return Err(GatewayError::Validation(NO_MESSAGE_PROVIDED.to_string()));
        }

        let request = {
            let mut state = self.state.lock().await;
            if let Some(name) = detect_bot_name(user_message)
                && state.identity.set_name(&name)
            {
                tracing::info!(bot_name = %name, "Bot renamed");
            }
            build_request(state.identity.name(), state.history.turns(), user_message)
        };

        let result = self.chain.complete(&request).await?;
        if result.attempts > 1 {
            tracing::info!(
                provider = %result.provider_name,
                attempts = result.attempts,
                "Reply served by fallback provider"
            );
        }

        let mut state = self.state.lock().await;
        state.history.push_exchange(user_message, &result.reply);
        Ok(result.reply)
    }

    pub async fn bot_name(&self) -> String {
        self.state.lock().await.identity.name().to_string()
    }

    pub async fn history_len(&self) -> usize {
        self.state.lock().await.history.len()
    }

    /// Copy of the remembered turns, oldest first.
    pub async fn history_snapshot(&self) -> Vec<ConversationTurn> {
        self.state.lock().await.history.turns().cloned().collect()
    }

    pub fn provider_status(&self) -> Vec<ProviderStatusInfo> {
        self.chain.health_status()
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.chain.provider_names()
    }
}
