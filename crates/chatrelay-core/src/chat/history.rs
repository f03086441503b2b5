//! Short-term conversational memory.
//!
//! A bounded FIFO of conversation turns holding the last N user/assistant
//! exchanges. Turns are only ever appended in pairs, so the length is always
//! even and never exceeds `2 * max_exchanges`.

use std::collections::VecDeque;

use chatrelay_types::llm::{ConversationTurn, Message};

/// Bounded, ordered conversation history (oldest first).
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    turns: VecDeque<ConversationTurn>,
    max_exchanges: usize,
}

impl ConversationHistory {
    /// Create an empty history remembering up to `max_exchanges` exchanges.
    pub fn new(max_exchanges: usize) -> Self {
        Self {
            turns: VecDeque::with_capacity(max_exchanges.saturating_mul(2)),
            max_exchanges,
        }
    }

    /// Maximum number of turns kept (two per exchange).
    pub fn capacity(&self) -> usize {
        self.max_exchanges.saturating_mul(2)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Turns in chronological order.
    pub fn turns(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }

    /// Append one completed exchange, evicting the oldest turns beyond capacity.
    ///
    /// Returns `false` and leaves the history untouched if either side is
    /// empty after trimming.
    pub fn push_exchange(&mut self, user: &str, assistant: &str) -> bool {
        if user.trim().is_empty() || assistant.trim().is_empty() {
            return false;
        }

        self.turns.push_back(Message::user(user));
        self.turns.push_back(Message::assistant(assistant));

        while self.turns.len() > self.capacity() {
            self.turns.pop_front();
        }
        true
    }
}
