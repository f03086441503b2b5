//! Main interactive chat loop.
//!
//! Reads lines from the async readline prompt, handles slash commands and
//! hands everything else to the `ClientRelay`, which renders into a
//! [`TerminalView`] over the readline's shared writer.

use std::io::Write;

use console::style;

use chatrelay_core::relay::client::ClientRelay;
use chatrelay_core::relay::retry::RetryPolicy;
use chatrelay_core::relay::view::{ChatView, Sender};
use chatrelay_infra::relay::http_transport::HttpGatewayTransport;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::TerminalView;

/// First bot line of every session.
pub const GREETING: &str = "Hello! Ask me anything.";

pub async fn run_chat_loop(gateway_url: &str, policy: RetryPolicy) -> anyhow::Result<()> {
    let transport = HttpGatewayTransport::new(gateway_url)?;
    tracing::debug!(endpoint = transport.endpoint(), "Starting chat session");
    let mut relay = ClientRelay::new(transport, policy);

    let prompt = format!("{} ", style("You >").green().bold());
    let (mut input, mut writer) = ChatInput::new(prompt)?;

    print_welcome_banner(&mut writer, gateway_url, policy.max_retries);
    let mut view = TerminalView::new(writer.clone()).with_echo_user(false);
    view.render(Sender::Bot, GREETING);

    loop {
        let line = match input.read_line().await {
            InputEvent::Line(line) => line,
            InputEvent::Eof => break,
            InputEvent::Interrupted => {
                let _ = writeln!(writer, "  {}", style("(Use /exit or Ctrl+D to quit)").dim());
                continue;
            }
        };

        if let Some(command) = commands::parse(&line) {
            match command {
                ChatCommand::Help => {
                    let _ = write!(writer, "{}", commands::help_text());
                }
                ChatCommand::Clear => input.clear(),
                ChatCommand::Exit => break,
                ChatCommand::Retry => {
                    if relay.pending_retry().is_none() {
                        let _ = writeln!(writer, "  {}", style("Nothing to retry.").dim());
                    } else {
                        relay.retry_last(&mut view).await;
                    }
                }
                ChatCommand::Unknown(cmd) => {
                    let _ = writeln!(
                        writer,
                        "  {} {}",
                        style(format!("Unknown command: {cmd}")).yellow(),
                        style("(type /help)").dim()
                    );
                }
            }
            continue;
        }

        relay.submit(&mut view, &line).await;
    }

    view.clear_thinking();
    let _ = writeln!(writer, "\n  {}", style("Session ended.").dim());
    input.flush();
    Ok(())
}
