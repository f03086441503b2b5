//! OpenAI-compatible LLM provider implementation.
//!
//! A single [`OpenAiCompatibleProvider`] serves OpenRouter, OpenAI, Google
//! Gemini, Mistral and GLM via configurable base URLs. Requests go straight
//! through `reqwest` so the raw status code and error payload are available
//! for quota classification.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is only exposed
//! when building the `Authorization` header.

pub mod config;

use std::time::Duration;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{Instrument, info_span};

use chatrelay_core::llm::provider::LlmProvider;
use chatrelay_types::llm::{CompletionRequest, CompletionResponse, LlmError, Message};

use self::config::OpenAiCompatConfig;

/// Words in an upstream error message that indicate an exhausted plan.
const QUOTA_MARKERS: [&str; 3] = ["balance", "credit", "insufficient"];

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [Message],
}

#[derive(Debug, Default, Deserialize)]
struct ChatCompletionReply {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ErrorDetail>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// Unified provider for any OpenAI-compatible chat completions API.
///
/// Does NOT derive Debug so the key never ends up in logs.
pub struct OpenAiCompatibleProvider {
    client: reqwest::Client,
    provider_name: String,
    base_url: String,
    api_key: Option<SecretString>,
    api_key_env: String,
    model: String,
    timeout: Duration,
}

impl OpenAiCompatibleProvider {
    pub fn new(config: OpenAiCompatConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            provider_name: config.provider_name,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            api_key_env: config.api_key_env,
            model: config.model,
            timeout: config.timeout,
        })
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn map_send_error(&self, err: reqwest::Error) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout {
                after_secs: self.timeout.as_secs(),
            }
        } else {
            LlmError::Provider {
                message: format!("HTTP request failed: {err}"),
            }
        }
    }

    async fn send_request(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let api_key = self.api_key.as_ref().ok_or_else(|| LlmError::MissingApiKey {
            env_var: self.api_key_env.clone(),
        })?;

        let model = if request.model.is_empty() {
            &self.model
        } else {
            &request.model
        };
        let body = ChatCompletionBody {
            model,
            messages: &request.messages,
        };

        let response = self
            .client
            .post(self.url())
            .bearer_auth(api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            return Err(classify_failure(status, &text, model));
        }

        let reply: ChatCompletionReply = serde_json::from_str(&text)
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        // Some gateways report failures inside a 200 body.
        if let Some(detail) = reply.error {
            let message = detail.message.unwrap_or_default();
            return Err(if mentions_quota(&message) {
                LlmError::QuotaExceeded { message }
            } else {
                LlmError::Provider { message }
            });
        }

        let content = reply
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default();

        Ok(CompletionResponse {
            id: reply.id.unwrap_or_default(),
            content,
            model: reply.model.unwrap_or_else(|| model.to_string()),
        })
    }
}

fn mentions_quota(message: &str) -> bool {
    let lower = message.to_lowercase();
    QUOTA_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Classify a non-success upstream response.
///
/// 429, or an `error.message` mentioning balance/credit/insufficient funds,
/// is quota-exceeded regardless of status. Only the parsed message is
/// scanned; a raw body is used for the error text alone.
fn classify_failure(status: StatusCode, body: &str, model: &str) -> LlmError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.error)
        .and_then(|d| d.message);
    let quota_message = parsed.as_deref().is_some_and(mentions_quota);
    let message = parsed.unwrap_or_else(|| body.trim().to_string());

    if status == StatusCode::TOO_MANY_REQUESTS || quota_message {
        return LlmError::QuotaExceeded {
            message: format!("HTTP {}: {message}", status.as_u16()),
        };
    }

    match status {
        StatusCode::NOT_FOUND => LlmError::ModelNotFound {
            model: model.to_string(),
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::AuthenticationFailed,
        _ => LlmError::Provider {
            message: format!("HTTP {}: {message}", status.as_u16()),
        },
    }
}

impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.provider_name
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let span = info_span!(
            "gen_ai.complete",
            gen_ai.operation.name = "chat",
            gen_ai.provider.name = %self.provider_name,
            gen_ai.request.model = %self.model,
            gen_ai.request.messages = request.messages.len(),
        );
        self.send_request(request).instrument(span).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use axum::Router;
    use axum::http::HeaderMap;
    use axum::routing::post;
    use serde_json::{Value, json};

    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn provider(base_url: &str, key: Option<&str>, timeout: Duration) -> OpenAiCompatibleProvider {
        OpenAiCompatibleProvider::new(OpenAiCompatConfig {
            provider_name: "openrouter".into(),
            base_url: base_url.into(),
            api_key: key.map(|k| SecretString::from(k.to_string())),
            api_key_env: "OPENROUTER_API_KEY".into(),
            model: "anthropic/claude-3-haiku".into(),
            timeout,
        })
        .unwrap()
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: String::new(),
            messages: vec![Message::system("be nice"), Message::user("Hello")],
        }
    }

    fn status_route(status: u16, body: Value) -> Router {
        Router::new().route(
            "/chat/completions",
            post(move || {
                let body = body.clone();
                async move { (StatusCode::from_u16(status).unwrap(), Json(body)) }
            }),
        )
    }

    #[tokio::test]
    async fn test_complete_sends_model_messages_and_bearer() {
        let router = Router::new().route(
            "/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let summary = format!(
                    "{auth}|{}|{}|{}",
                    body["model"].as_str().unwrap_or_default(),
                    body["messages"].as_array().map(|m| m.len()).unwrap_or(0),
                    body["messages"][0]["role"].as_str().unwrap_or_default(),
                );
                Json(json!({
                    "id": "gen-1",
                    "model": "anthropic/claude-3-haiku",
                    "choices": [{"message": {"role": "assistant", "content": summary}}]
                }))
            }),
        );
        let base = spawn_upstream(router).await;
        let provider = provider(&base, Some("sk-or-v1-test"), Duration::from_secs(5));

        let response = provider.complete(&request()).await.unwrap();
        assert_eq!(
            response.content,
            "Bearer sk-or-v1-test|anthropic/claude-3-haiku|2|system"
        );
        assert_eq!(response.id, "gen-1");
    }

    #[tokio::test]
    async fn test_429_is_quota() {
        let base = spawn_upstream(status_route(429, json!({"error": {"message": "Rate limit"}}))).await;
        let err = provider(&base, Some("k"), Duration::from_secs(5))
            .complete(&request())
            .await
            .unwrap_err();
        assert!(err.is_quota());
    }

    #[tokio::test]
    async fn test_insufficient_credits_message_is_quota() {
        let body = json!({"error": {"message": "Insufficient credits. Add more using https://openrouter.ai/credits"}});
        let base = spawn_upstream(status_route(402, body)).await;
        let err = provider(&base, Some("k"), Duration::from_secs(5))
            .complete(&request())
            .await
            .unwrap_err();
        assert!(err.is_quota());
    }

    #[tokio::test]
    async fn test_404_is_model_not_found() {
        let base = spawn_upstream(status_route(404, json!({"error": {"message": "No such model"}}))).await;
        let err = provider(&base, Some("k"), Duration::from_secs(5))
            .complete(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::ModelNotFound { .. }));
        assert!(!err.is_quota());
    }

    #[tokio::test]
    async fn test_500_is_generic_failure() {
        let base = spawn_upstream(status_route(500, json!({"error": {"message": "boom"}}))).await;
        let err = provider(&base, Some("k"), Duration::from_secs(5))
            .complete(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Provider { .. }));
    }

    #[tokio::test]
    async fn test_error_inside_200_body() {
        let body = json!({"error": {"message": "Your account balance is too low"}});
        let base = spawn_upstream(status_route(200, body)).await;
        let err = provider(&base, Some("k"), Duration::from_secs(5))
            .complete(&request())
            .await
            .unwrap_err();
        assert!(err.is_quota());
    }

    #[tokio::test]
    async fn test_missing_content_yields_empty_reply() {
        let base = spawn_upstream(status_route(200, json!({"choices": []}))).await;
        let response = provider(&base, Some("k"), Duration::from_secs(5))
            .complete(&request())
            .await
            .unwrap();
        assert!(response.content.is_empty());
    }

    #[tokio::test]
    async fn test_timeout_is_not_quota() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                Json(json!({"choices": [{"message": {"content": "late"}}]}))
            }),
        );
        let base = spawn_upstream(router).await;
        let err = provider(&base, Some("k"), Duration::from_millis(100))
            .complete(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Timeout { .. }));
        assert!(!err.is_quota());
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let err = provider("http://127.0.0.1:1", None, Duration::from_secs(1))
            .complete(&request())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            LlmError::MissingApiKey {
                env_var: "OPENROUTER_API_KEY".into()
            }
        );
    }

    #[test]
    fn test_classify_plain_text_body() {
        let err = classify_failure(StatusCode::BAD_GATEWAY, "upstream down", "m");
        assert_eq!(
            err,
            LlmError::Provider {
                message: "HTTP 502: upstream down".into()
            }
        );
    }

    #[test]
    fn test_html_outage_page_mentioning_credits_is_not_quota() {
        let body = "<html><body><h1>503 Service Unavailable</h1>\
                    <a href=\"/credits\">Credits</a></body></html>";
        let err = classify_failure(StatusCode::SERVICE_UNAVAILABLE, body, "m");
        assert!(matches!(err, LlmError::Provider { .. }));
        assert!(!err.is_quota());
    }

    #[test]
    fn test_quota_words_outside_error_message_are_ignored() {
        let body = json!({"error": {"code": 400, "metadata": {"raw": "insufficient context window"}}});
        let err = classify_failure(StatusCode::BAD_REQUEST, &body.to_string(), "m");
        assert!(matches!(err, LlmError::Provider { .. }));
    }
}
