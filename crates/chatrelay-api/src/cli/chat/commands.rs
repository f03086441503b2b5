//! Slash commands for the chat loop.

use console::style;

#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    Clear,
    Exit,
    /// Resend the last message that failed with a retryable error.
    Retry,
    Unknown(String),
}

/// Parse user input as a slash command. `None` for ordinary messages.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let cmd = trimmed
        .split_whitespace()
        .next()
        .unwrap_or(trimmed)
        .to_lowercase();

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        "/retry" | "/r" => Some(ChatCommand::Retry),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

pub fn help_text() -> String {
    let rows = [
        ("/help", "Show this help message"),
        ("/retry", "Resend the last failed message"),
        ("/clear", "Clear the screen"),
        ("/exit", "End the chat session"),
    ];

    let mut out = format!("\n  {}\n\n", style("Available commands:").bold());
    for (cmd, desc) in rows {
        out.push_str(&format!("  {:<8} {desc}\n", style(cmd).cyan()));
    }
    out.push_str(&format!("\n  {}\n", style("Ctrl+D to exit").dim()));
    out
}
