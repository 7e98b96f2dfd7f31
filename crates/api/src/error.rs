//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use processor::ProcessorError;
use sparql::SparqlError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Fetching or reducing events failed.
    Processor(ProcessorError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Processor(err) => processor_error_to_response(err),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn processor_error_to_response(err: ProcessorError) -> (StatusCode, String) {
    match &err {
        ProcessorError::Sparql(SparqlError::Query(_)) => (StatusCode::BAD_REQUEST, err.to_string()),
        ProcessorError::Sparql(_) => {
            tracing::warn!(error = %err, "SPARQL endpoint failed");
            (StatusCode::BAD_GATEWAY, err.to_string())
        }
        ProcessorError::Event(_) | ProcessorError::Usage(_) => {
            tracing::error!(error = %err, "event reduction failed");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

impl From<ProcessorError> for ApiError {
    fn from(err: ProcessorError) -> Self {
        ApiError::Processor(err)
    }
}
