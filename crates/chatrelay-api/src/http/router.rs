//! Axum router configuration with middleware.
//!
//! Routes: `POST /message`, `GET /health`.
//! Middleware: CORS (any origin), request tracing, panic capture.
//!
//! When the configured public directory exists its files are served for
//! every other path; otherwise only the API is served.

use std::any::Any;

use axum::Router;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use chatrelay_types::error::GatewayError;

use crate::http::error::AppError;
use crate::http::handlers;
use crate::state::AppState;

/// Turn a handler panic into the generic 500 `{error}` body.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    AppError(GatewayError::Unknown(detail)).into_response()
}

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    let public_dir = state.public_dir.clone();

    let router = Router::new()
        .route("/message", post(handlers::message::post_message))
        .route("/health", get(handlers::health::health))
        .with_state(state);

    let router = match public_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
