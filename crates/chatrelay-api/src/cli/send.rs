//! One-shot `chatrelay send`: deliver a single message and print the reply.
//!
//! Goes through the same `ClientRelay` as the interactive client, so the
//! retry policy and error texts are identical.

use std::io::Write;
use std::process::ExitCode;

use chatrelay_core::relay::client::{ClientRelay, SubmitOutcome, describe_error};
use chatrelay_core::relay::format::FormattedReply;
use chatrelay_core::relay::retry::RetryPolicy;
use chatrelay_core::relay::view::{ChatView, Sender};
use chatrelay_infra::relay::http_transport::HttpGatewayTransport;
use serde_json::json;

use super::chat::renderer::TerminalView;

/// Discards everything. The JSON mode prints the outcome itself.
struct SilentView;

impl ChatView for SilentView {
    fn render(&mut self, _sender: Sender, _text: &str) {}
    fn render_reply(&mut self, _reply: &FormattedReply) {}
    fn show_thinking(&mut self) {}
    fn clear_thinking(&mut self) {}
    fn render_error(&mut self, _message: &str, _can_retry: bool) {}
}

/// The JSON document printed by `send --json`.
pub fn outcome_json(outcome: &SubmitOutcome) -> serde_json::Value {
    match outcome {
        SubmitOutcome::Delivered(reply) => json!({ "reply": reply }),
        SubmitOutcome::Failed { error, .. } => json!({ "error": describe_error(error) }),
        SubmitOutcome::Skipped => json!({ "error": "No message provided." }),
    }
}

pub async fn run(
    gateway_url: &str,
    message: &str,
    policy: RetryPolicy,
    json_output: bool,
) -> anyhow::Result<ExitCode> {
    let outcome = deliver(gateway_url, message, policy, json_output).await?;
    Ok(match outcome {
        SubmitOutcome::Delivered(_) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

async fn deliver(
    gateway_url: &str,
    message: &str,
    policy: RetryPolicy,
    json_output: bool,
) -> anyhow::Result<SubmitOutcome> {
    let transport = HttpGatewayTransport::new(gateway_url)?;
    let mut relay = ClientRelay::new(transport, policy);

    let outcome = if json_output {
        let outcome = relay.submit(&mut SilentView, message).await;
        println!("{}", serde_json::to_string_pretty(&outcome_json(&outcome))?);
        outcome
    } else {
        let interactive = console::user_attended_stderr();
        let mut view = TerminalView::new(std::io::stdout())
            .with_spinner(interactive)
            .with_echo_user(false);
        let outcome = relay.submit(&mut view, message).await;
        if outcome == SubmitOutcome::Skipped {
            eprintln!("No message provided.");
        }
        let _ = std::io::stdout().flush();
        outcome
    };

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatrelay_types::error::RelayError;

    #[test]
    fn test_outcome_json_shapes() {
        assert_eq!(
            outcome_json(&SubmitOutcome::Delivered("hi".into())),
            json!({"reply": "hi"})
        );
        assert_eq!(
            outcome_json(&SubmitOutcome::Failed {
                error: RelayError::QuotaExceeded(String::new()),
                can_retry: false,
            }),
            json!({"error": "API quota exceeded. Please try again later."})
        );
        assert_eq!(
            outcome_json(&SubmitOutcome::Skipped),
            json!({"error": "No message provided."})
        );
    }

    #[tokio::test]
    async fn test_unreachable_gateway_fails() {
        let outcome = deliver("http://127.0.0.1:9", "hello", RetryPolicy::none(), true)
            .await
            .unwrap();
        assert_eq!(
            outcome_json(&outcome),
            json!({"error": "Error: Could not reach server."})
        );
    }
}
