//! Rendering seam between the relay state machine and a concrete UI.

use std::fmt;

use super::client::RelayState;
use super::format::FormattedReply;

/// Who a rendered message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "You"),
            Sender::Bot => write!(f, "Bot"),
        }
    }
}

/// A chat log the relay appends to.
pub trait ChatView {
    /// Append a plain message bubble.
    fn render(&mut self, sender: Sender, text: &str);

    /// Append a formatted bot reply.
    fn render_reply(&mut self, reply: &FormattedReply);

    /// Show the transient "thinking" placeholder.
    fn show_thinking(&mut self);

    /// Remove the placeholder, if shown.
    fn clear_thinking(&mut self);

    /// Append an error bubble. `can_retry` offers the manual retry affordance.
    fn render_error(&mut self, message: &str, can_retry: bool);

    /// Observe state machine transitions.
    fn on_state(&mut self, _state: &RelayState) {}
}
