//! Upstream request assembly.
//!
//! Every request is: one system instruction naming the bot, the remembered
//! turns in chronological order, then the new user turn.

use chatrelay_types::llm::{CompletionRequest, ConversationTurn, Message};

/// Builds the system instruction embedding the bot's current name.
pub struct SystemPromptBuilder;

impl SystemPromptBuilder {
    pub fn build(bot_name: &str) -> String {
        format!(
            "You are a helpful, friendly AI assistant. The user has named you {bot_name}. \
             Respond as {bot_name} in a natural, conversational, and engaging way, as if you \
             were a human chatting with a friend. Use clear language, show empathy, and keep \
             your answers concise and approachable."
        )
    }
}

/// Assemble the upstream request. `model` is left empty so each provider
/// fills in its own.
pub fn build_request<'a>(
    bot_name: &str,
    history: impl Iterator<Item = &'a ConversationTurn>,
    user_message: &str,
) -> CompletionRequest {
    let mut messages = vec![Message::system(SystemPromptBuilder::build(bot_name))];
    messages.extend(history.cloned());
    messages.push(Message::user(user_message));

    CompletionRequest {
        model: String::new(),
        messages,
    }
}
