//! `GET /health`: liveness plus conversation and provider statistics.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use chatrelay_types::llm::ProviderStatusInfo;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
    pub mode: String,
    pub bot_name: String,
    pub history_len: usize,
    pub providers: Vec<ProviderStatusInfo>,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let gateway = &state.gateway;
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.started_at.elapsed().as_secs(),
        mode: gateway.mode().to_string(),
        bot_name: gateway.bot_name().await,
        history_len: gateway.history_len().await,
        providers: gateway.provider_status(),
    })
}
