//! Application error type mapping to HTTP status codes and `{error}` bodies.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use chatrelay_types::chat::ErrorBody;
use chatrelay_types::error::GatewayError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub struct AppError(pub GatewayError);

impl From<GatewayError> for AppError {
    fn from(e: GatewayError) -> Self {
        AppError(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(GatewayError::Validation(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match &self.0 {
            GatewayError::Validation(_) => {}
            GatewayError::QuotaExceeded(detail) => {
                tracing::warn!(detail = %detail, "Quota exceeded, returning 429");
            }
            GatewayError::ProviderUnavailable(detail) => {
                tracing::error!(detail = %detail, "AI service failed, returning 500");
            }
            GatewayError::Unknown(detail) => {
                tracing::error!(detail = %detail, "Unexpected error in /message");
            }
        }

        let body = ErrorBody {
            error: self.0.client_message(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (GatewayError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (
                GatewayError::QuotaExceeded("x".into()),
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (
                GatewayError::ProviderUnavailable("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                GatewayError::Unknown("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(AppError(err).into_response().status(), expected);
        }
    }
}
