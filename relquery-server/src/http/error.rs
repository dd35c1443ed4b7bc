//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::GatewayError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Malformed query string or body (400)
    Validation { message: String },

    /// Descriptor errors are 400, everything else 500 (logged)
    Gateway(GatewayError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation { message } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "validation_error",
                    "message": message
                }),
            ),
            Self::Gateway(e) if e.is_client_error() => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": e.kind(),
                    "message": e.to_string()
                }),
            ),
            Self::Gateway(e @ GatewayError::Query(_)) => {
                tracing::error!("Query error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "query_error",
                        "message": "the query could not be executed"
                    }),
                )
            }
            Self::Gateway(e) => {
                // Log the actual error, return generic message
                tracing::error!("Gateway error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": "an internal error occurred"
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<GatewayError> for ApiError {
    fn from(e: GatewayError) -> Self {
        Self::Gateway(e)
    }
}
