//! `POST /message`: one user message in, one reply out.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use uuid::Uuid;

use chatrelay_types::chat::{MessageReply, MessageRequest};

use crate::http::error::AppError;
use crate::state::AppState;

const PREVIEW_CHARS: usize = 50;

/// First 50 characters of a message for logging.
fn preview(message: &str) -> String {
    let mut chars = message.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// POST /message
///
/// A missing, empty or non-string `message` is a 400 before any upstream call.
pub async fn post_message(
    State(state): State<AppState>,
    payload: Result<Json<MessageRequest>, JsonRejection>,
) -> Result<Json<MessageReply>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7();
    let Json(payload) = payload?;
    let message = payload.message.unwrap_or_default();

    tracing::info!(%request_id, preview = %preview(&message), "Processing message");

    let reply = state.gateway.handle_message(&message).await?;

    tracing::info!(
        %request_id,
        latency_ms = start.elapsed().as_millis() as u64,
        "Successfully got reply from AI service"
    );
    Ok(Json(MessageReply { reply }))
}
