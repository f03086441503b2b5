//! Terminal rendering of the chat log.
//!
//! [`TerminalView`] implements the relay's `ChatView` over any writer: user
//! and bot bubbles, numbered lists from formatted replies, a spinner while
//! waiting and red error lines with a `/retry` hint.

use std::io::Write;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use chatrelay_core::relay::client::RelayState;
use chatrelay_core::relay::format::{Block, FormattedReply};
use chatrelay_core::relay::view::{ChatView, Sender};

pub struct TerminalView<W: Write> {
    out: W,
    spinner: Option<ProgressBar>,
    use_spinner: bool,
    echo_user: bool,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            spinner: None,
            use_spinner: true,
            echo_user: true,
        }
    }

    /// Disable the animated spinner (non-interactive output).
    pub fn with_spinner(mut self, enabled: bool) -> Self {
        self.use_spinner = enabled;
        self
    }

    /// Whether the user's own message is echoed back. The readline prompt
    /// already shows it in interactive mode.
    pub fn with_echo_user(mut self, enabled: bool) -> Self {
        self.echo_user = enabled;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn label(sender: Sender) -> String {
        match sender {
            Sender::User => style(format!("{sender} >")).green().bold().to_string(),
            Sender::Bot => style(format!("{sender} >")).cyan().bold().to_string(),
        }
    }
}

/// Render a formatted reply as indented terminal lines.
pub fn reply_lines(reply: &FormattedReply) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, block) in reply.blocks.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        match block {
            Block::Paragraph(paragraph) => {
                lines.extend(paragraph.iter().map(|line| format!("  {line}")));
            }
            Block::OrderedList(items) => {
                for item in items {
                    lines.push(format!(
                        "  {} {}",
                        style(format!("{}.", item.number)).bold(),
                        item.text
                    ));
                }
            }
        }
    }
    lines
}

impl<W: Write> ChatView for TerminalView<W> {
    fn render(&mut self, sender: Sender, text: &str) {
        if sender == Sender::User && !self.echo_user {
            return;
        }
        let _ = writeln!(self.out, "\n{} {text}", Self::label(sender));
    }

    fn render_reply(&mut self, reply: &FormattedReply) {
        let _ = writeln!(self.out, "\n{}", Self::label(Sender::Bot));
        for line in reply_lines(reply) {
            let _ = writeln!(self.out, "{line}");
        }
        let _ = self.out.flush();
    }

    fn show_thinking(&mut self) {
        if !self.use_spinner || self.spinner.is_some() {
            return;
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}")
        {
            spinner.set_style(spinner_style);
        }
        spinner.set_message("thinking...");
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    fn clear_thinking(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn render_error(&mut self, message: &str, can_retry: bool) {
        let _ = writeln!(self.out, "\n  {} {}", style("!").red().bold(), style(message).red());
        if can_retry {
            let _ = writeln!(
                self.out,
                "  {}",
                style("Type /retry to send it again").dim()
            );
        }
        let _ = self.out.flush();
    }

    fn on_state(&mut self, state: &RelayState) {
        if let (Some(spinner), RelayState::Waiting { retry, delay }) = (&self.spinner, state) {
            spinner.set_message(format!(
                "retrying in {}s (retry {retry})...",
                delay.as_secs_f32()
            ));
        }
    }
}
