//! Bot name assignment.
//!
//! Users can rename the bot mid-conversation ("I'll call you Nova"). The
//! detector is an ordered list of case-insensitive rules; the first rule that
//! matches wins and its capture group (trimmed) becomes the new name.

use std::sync::LazyLock;

use regex::Regex;

/// Name used until the user assigns one.
pub const DEFAULT_BOT_NAME: &str = "Assistant";

/// Allowed name characters: ASCII letters, digits, space, hyphen, underscore.
const NAME_CAPTURE: &str = r"([A-Za-z0-9_\- ]{2,30})";

/// Rule phrases, in priority order.
const NAME_PHRASES: [&str; 4] = ["call you", "your name is", "I'll call you", "I want to call you"];

static NAME_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    NAME_PHRASES
        .iter()
        .map(|phrase| {
            Regex::new(&format!("(?i){phrase} {NAME_CAPTURE}"))
                .expect("name assignment pattern is a valid regex")
        })
        .collect()
});

/// Detect a name-assignment phrase in a user message.
///
/// Only the first matching rule is consulted. Returns `None` when no rule
/// matches or that rule's capture is blank.
pub fn detect_bot_name(message: &str) -> Option<String> {
    let captures = NAME_RULES.iter().find_map(|rule| rule.captures(message))?;
    let name = captures.get(1)?.as_str().trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// The bot's current display name. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    name: String,
}

impl BotIdentity {
    /// Create an identity; a blank name falls back to [`DEFAULT_BOT_NAME`].
    pub fn new(name: &str) -> Self {
        let name = name.trim();
        Self {
            name: if name.is_empty() {
                DEFAULT_BOT_NAME.to_string()
            } else {
                name.to_string()
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the bot. Blank names are ignored; returns whether the name changed.
    pub fn set_name(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || name == self.name {
            return false;
        }
        self.name = name.to_string();
        true
    }
}

impl Default for BotIdentity {
    fn default() -> Self {
        Self::new(DEFAULT_BOT_NAME)
    }
}
