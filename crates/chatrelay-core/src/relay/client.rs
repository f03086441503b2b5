//! Per-submission state machine of the client relay.
//!
//! `Idle -> Sending -> Idle` on success or a non-retryable failure. A
//! retryable failure (network error or 5xx) moves to `Waiting`, sleeps
//! `n * base_delay`, and sends again, at most `max_retries` times. Quota
//! responses are shown immediately and never resent.

use std::time::Duration;

use chatrelay_types::error::RelayError;

use super::format::format_reply;
use super::retry::RetryPolicy;
use super::transport::GatewayTransport;
use super::view::{ChatView, Sender};

/// Shown when a 200 response carries no `reply`.
pub const NO_REPLY_TEXT: &str = "Sorry, I could not understand.";

/// Shown when the gateway cannot be reached after all retries.
pub const UNREACHABLE_TEXT: &str = "Error: Could not reach server.";

/// Shown for a 429 without a server-provided message.
pub const QUOTA_FALLBACK_TEXT: &str = "API quota exceeded. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayState {
    Idle,
    /// `attempt` is 1-based; attempt 1 is the first send.
    Sending { attempt: u32 },
    /// Sleeping before retry number `retry`.
    Waiting { retry: u32, delay: Duration },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input, or nothing to retry. No bubble, no network call.
    Skipped,
    Delivered(String),
    Failed { error: RelayError, can_retry: bool },
}

/// User-facing text for a failed send.
pub fn describe_error(error: &RelayError) -> String {
    match error {
        RelayError::Network(_) => UNREACHABLE_TEXT.to_string(),
        RelayError::QuotaExceeded(message) if !message.trim().is_empty() => message.clone(),
        RelayError::QuotaExceeded(_) => QUOTA_FALLBACK_TEXT.to_string(),
        RelayError::Server { message, .. } | RelayError::Rejected { message, .. }
            if !message.trim().is_empty() =>
        {
            message.clone()
        }
        RelayError::Server { .. } | RelayError::Rejected { .. } => NO_REPLY_TEXT.to_string(),
    }
}

pub struct ClientRelay<T> {
    transport: T,
    policy: RetryPolicy,
    state: RelayState,
    /// Message whose delivery failed retryably, for the manual retry action.
    pending_retry: Option<String>,
}

impl<T: GatewayTransport> ClientRelay<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self {
            transport,
            policy,
            state: RelayState::Idle,
            pending_retry: None,
        }
    }

    pub fn state(&self) -> &RelayState {
        &self.state
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Message the manual retry action would resend.
    pub fn pending_retry(&self) -> Option<&str> {
        self.pending_retry.as_deref()
    }

    /// Submit a user line: render it, then deliver it with bounded retry.
    pub async fn submit<V: ChatView + ?Sized>(
        &mut self,
        view: &mut V,
        message: &str,
    ) -> SubmitOutcome {
        let message = message.trim();
        if message.is_empty() {
            return SubmitOutcome::Skipped;
        }

        view.render(Sender::User, message);
        self.deliver(view, message.to_string()).await
    }

    /// Re-run the send path for the last message that failed retryably.
    pub async fn retry_last<V: ChatView + ?Sized>(&mut self, view: &mut V) -> SubmitOutcome {
        match self.pending_retry.take() {
            Some(message) => self.deliver(view, message).await,
            None => SubmitOutcome::Skipped,
        }
    }

    fn transition<V: ChatView + ?Sized>(&mut self, view: &mut V, state: RelayState) {
        view.on_state(&state);
        self.state = state;
    }

    async fn deliver<V: ChatView + ?Sized>(&mut self, view: &mut V, message: String) -> SubmitOutcome {
        // Only the latest failure can be retried.
        self.pending_retry = None;
        view.show_thinking();
        let mut retries_done = 0;

        loop {
            self.transition(
                view,
                RelayState::Sending {
                    attempt: retries_done + 1,
                },
            );

            match self.transport.send(&message).await {
                Ok(reply) => {
                    view.clear_thinking();
                    view.render_reply(&format_reply(&reply));
                    self.transition(view, RelayState::Idle);
                    return SubmitOutcome::Delivered(reply);
                }
                Err(error) if error.is_retryable() && self.policy.allows(retries_done) => {
                    retries_done += 1;
                    let delay = self.policy.delay_for(retries_done);
                    tracing::debug!(
                        error = %error,
                        retry = retries_done,
                        delay_ms = delay.as_millis() as u64,
                        "Send failed, retrying"
                    );
                    self.transition(
                        view,
                        RelayState::Waiting {
                            retry: retries_done,
                            delay,
                        },
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(error) => {
                    view.clear_thinking();
                    let can_retry = error.is_retryable();
                    if can_retry {
                        self.pending_retry = Some(message);
                    }
                    tracing::warn!(error = %error, attempts = retries_done + 1, "Send failed");
                    view.render_error(&describe_error(&error), can_retry);
                    self.transition(view, RelayState::Idle);
                    return SubmitOutcome::Failed { error, can_retry };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::format::FormattedReply;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Message(Sender, String),
        Reply(String),
        Thinking,
        ClearThinking,
        Error(String, bool),
    }

    #[derive(Default)]
    struct RecordingView {
        events: Vec<Event>,
        states: Vec<RelayState>,
    }

    impl ChatView for RecordingView {
        fn render(&mut self, sender: Sender, text: &str) {
            self.events.push(Event::Message(sender, text.to_string()));
        }

        fn render_reply(&mut self, reply: &FormattedReply) {
            self.events.push(Event::Reply(reply.to_plain()));
        }

        fn show_thinking(&mut self) {
            self.events.push(Event::Thinking);
        }

        fn clear_thinking(&mut self) {
            self.events.push(Event::ClearThinking);
        }

        fn render_error(&mut self, message: &str, can_retry: bool) {
            self.events.push(Event::Error(message.to_string(), can_retry));
        }

        fn on_state(&mut self, state: &RelayState) {
            self.states.push(state.clone());
        }
    }

    #[derive(Clone, Default)]
    struct ScriptedTransport {
        script: Arc<Mutex<VecDeque<Result<String, RelayError>>>>,
        sent_at: Arc<Mutex<Vec<(String, Instant)>>>,
    }

    impl ScriptedTransport {
        fn new(script: Vec<Result<String, RelayError>>) -> Self {
            Self {
                script: Arc::new(Mutex::new(script.into())),
                sent_at: Arc::default(),
            }
        }

        fn calls(&self) -> usize {
            self.sent_at.lock().unwrap().len()
        }
    }

    impl GatewayTransport for ScriptedTransport {
        async fn send(&self, message: &str) -> Result<String, RelayError> {
            self.sent_at
                .lock()
                .unwrap()
                .push((message.to_string(), Instant::now()));
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(RelayError::Network("script exhausted".into())))
        }
    }

    fn server_error() -> RelayError {
        RelayError::Server {
            status: 500,
            message: "AI service failed. Please try again later.".into(),
        }
    }

    #[tokio::test]
    async fn test_blank_input_is_skipped() {
        let transport = ScriptedTransport::new(vec![]);
        let mut relay = ClientRelay::new(transport.clone(), RetryPolicy::default());
        let mut view = RecordingView::default();

        assert_eq!(relay.submit(&mut view, "   ").await, SubmitOutcome::Skipped);
        assert!(view.events.is_empty());
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_success_renders_user_then_reply() {
        let transport = ScriptedTransport::new(vec![Ok("1. a\n2. b".into())]);
        let mut relay = ClientRelay::new(transport, RetryPolicy::default());
        let mut view = RecordingView::default();

        let outcome = relay.submit(&mut view, "  list please ").await;
        assert_eq!(outcome, SubmitOutcome::Delivered("1. a\n2. b".into()));
        assert_eq!(
            view.events,
            vec![
                Event::Message(Sender::User, "list please".into()),
                Event::Thinking,
                Event::ClearThinking,
                Event::Reply("1. a\n2. b".into()),
            ]
        );
        assert_eq!(relay.state(), &RelayState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_with_linear_backoff() {
        let transport = ScriptedTransport::new(vec![
            Err(RelayError::Network("refused".into())),
            Err(server_error()),
            Ok("finally".into()),
        ]);
        let mut relay = ClientRelay::new(transport.clone(), RetryPolicy::default());
        let mut view = RecordingView::default();

        let outcome = relay.submit(&mut view, "hello").await;
        assert_eq!(outcome, SubmitOutcome::Delivered("finally".into()));

        let sent = transport.sent_at.lock().unwrap();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[1].1 - sent[0].1, Duration::from_secs(1));
        assert_eq!(sent[2].1 - sent[1].1, Duration::from_secs(2));
        assert!(sent.iter().all(|(msg, _)| msg == "hello"));

        assert_eq!(
            view.states,
            vec![
                RelayState::Sending { attempt: 1 },
                RelayState::Waiting {
                    retry: 1,
                    delay: Duration::from_secs(1)
                },
                RelayState::Sending { attempt: 2 },
                RelayState::Waiting {
                    retry: 2,
                    delay: Duration::from_secs(2)
                },
                RelayState::Sending { attempt: 3 },
                RelayState::Idle,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_two_retries() {
        let transport = ScriptedTransport::new(vec![
            Err(RelayError::Network("refused".into())),
            Err(RelayError::Network("refused".into())),
            Err(RelayError::Network("refused".into())),
            Ok("never".into()),
        ]);
        let mut relay = ClientRelay::new(transport.clone(), RetryPolicy::default());
        let mut view = RecordingView::default();

        let outcome = relay.submit(&mut view, "hello").await;
        assert!(matches!(
            outcome,
            SubmitOutcome::Failed {
                can_retry: true,
                ..
            }
        ));
        assert_eq!(transport.calls(), 3);
        assert_eq!(
            view.events.last(),
            Some(&Event::Error(UNREACHABLE_TEXT.into(), true))
        );
        assert_eq!(relay.pending_retry(), Some("hello"));
    }

    #[tokio::test]
    async fn test_quota_is_not_retried() {
        let transport = ScriptedTransport::new(vec![Err(RelayError::QuotaExceeded(
            "AI service quota exceeded.".into(),
        ))]);
        let mut relay = ClientRelay::new(transport.clone(), RetryPolicy::default());
        let mut view = RecordingView::default();

        let outcome = relay.submit(&mut view, "hello").await;
        assert!(matches!(
            outcome,
            SubmitOutcome::Failed {
                can_retry: false,
                ..
            }
        ));
        assert_eq!(transport.calls(), 1);
        assert_eq!(
            view.events.last(),
            Some(&Event::Error("AI service quota exceeded.".into(), false))
        );
        assert!(relay.pending_retry().is_none());
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let transport = ScriptedTransport::new(vec![Err(RelayError::Rejected {
            status: 400,
            message: "No message provided.".into(),
        })]);
        let mut relay = ClientRelay::new(transport.clone(), RetryPolicy::default());
        let mut view = RecordingView::default();

        relay.submit(&mut view, "hello").await;
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_retry_resends_same_message() {
        let transport = ScriptedTransport::new(vec![
            Err(server_error()),
            Ok("recovered".into()),
        ]);
        let mut relay = ClientRelay::new(transport.clone(), RetryPolicy::none());
        let mut view = RecordingView::default();

        let first = relay.submit(&mut view, "again please").await;
        assert!(matches!(first, SubmitOutcome::Failed { can_retry: true, .. }));

        let second = relay.retry_last(&mut view).await;
        assert_eq!(second, SubmitOutcome::Delivered("recovered".into()));
        assert!(relay.pending_retry().is_none());

        let sent = transport.sent_at.lock().unwrap();
        assert_eq!(sent[1].0, "again please");

        // The user bubble is rendered once; the retry only resends.
        let user_bubbles = view
            .events
            .iter()
            .filter(|e| matches!(e, Event::Message(Sender::User, _)))
            .count();
        assert_eq!(user_bubbles, 1);
    }

    #[tokio::test]
    async fn test_later_submission_replaces_pending_retry() {
        let transport = ScriptedTransport::new(vec![
            Err(RelayError::Network("refused".into())),
            Err(RelayError::QuotaExceeded("AI service quota exceeded.".into())),
        ]);
        let mut relay = ClientRelay::new(transport.clone(), RetryPolicy::none());
        let mut view = RecordingView::default();

        relay.submit(&mut view, "first").await;
        assert_eq!(relay.pending_retry(), Some("first"));

        relay.submit(&mut view, "second").await;
        assert!(relay.pending_retry().is_none());
        assert_eq!(relay.retry_last(&mut view).await, SubmitOutcome::Skipped);
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_success_clears_pending_retry() {
        let transport = ScriptedTransport::new(vec![
            Err(RelayError::Network("refused".into())),
            Ok("fine".into()),
        ]);
        let mut relay = ClientRelay::new(transport, RetryPolicy::none());
        let mut view = RecordingView::default();

        relay.submit(&mut view, "first").await;
        relay.submit(&mut view, "second").await;
        assert_eq!(relay.retry_last(&mut view).await, SubmitOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_retry_without_failure_is_skipped() {
        let transport = ScriptedTransport::new(vec![]);
        let mut relay = ClientRelay::new(transport.clone(), RetryPolicy::default());
        let mut view = RecordingView::default();

        assert_eq!(relay.retry_last(&mut view).await, SubmitOutcome::Skipped);
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn test_describe_error_fallbacks() {
        assert_eq!(
            describe_error(&RelayError::QuotaExceeded(String::new())),
            QUOTA_FALLBACK_TEXT
        );
        assert_eq!(
            describe_error(&RelayError::Network("x".into())),
            UNREACHABLE_TEXT
        );
        assert_eq!(
            describe_error(&RelayError::Server {
                status: 502,
                message: String::new()
            }),
            NO_REPLY_TEXT
        );
        assert_eq!(describe_error(&server_error()), "AI service failed. Please try again later.");
    }
}
