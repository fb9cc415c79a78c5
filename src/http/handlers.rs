//! Request handlers for the crypto API.
//!
//! Thin glue: length checks, delegation to the cipher service, and
//! mapping of the closed error taxonomy onto HTTP statuses. Input
//! problems answer 400 with a named reason; decryption failures answer
//! 500 with a fixed generic body so nothing about the internal check
//! leaks to the caller.

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::crypto::CipherError;
use crate::http::response::{ApiError, ResultBody};
use crate::http::server::AppState;
use crate::observability::metrics;

/// Request body for both crypto endpoints.
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    /// Plaintext for encrypt, envelope for decrypt. A missing field is
    /// treated as empty and rejected downstream.
    #[serde(default)]
    pub text: String,
}

pub async fn encrypt(
    State(state): State<AppState>,
    Json(request): Json<TextRequest>,
) -> Result<Json<ResultBody>, ApiError> {
    let start = Instant::now();

    let outcome = check_text_length(&state, &request.text).and_then(|()| {
        state
            .cipher
            .encrypt(&request.text)
            .map_err(|e| map_cipher_error(e, "Encryption failed"))
    });

    finish("encrypt", start, outcome)
}

pub async fn decrypt(
    State(state): State<AppState>,
    Json(request): Json<TextRequest>,
) -> Result<Json<ResultBody>, ApiError> {
    let start = Instant::now();

    let outcome = check_text_length(&state, &request.text).and_then(|()| {
        state
            .cipher
            .decrypt(&request.text)
            .map_err(|e| map_cipher_error(e, "Decryption failed"))
    });

    finish("decrypt", start, outcome)
}

/// Liveness probe. Sits behind the IP gate like every other route.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Callers are expected to keep payloads short; enforce the configured
/// cap here rather than in the cipher core.
fn check_text_length(state: &AppState, text: &str) -> Result<(), ApiError> {
    if text.chars().count() > state.max_text_chars {
        return Err(ApiError::bad_request("text exceeds maximum length"));
    }
    Ok(())
}

fn map_cipher_error(err: CipherError, generic: &'static str) -> ApiError {
    match err {
        CipherError::Input(reason) => ApiError::bad_request(reason),
        CipherError::Crypto => ApiError::internal(generic),
    }
}

fn finish(
    operation: &'static str,
    start: Instant,
    outcome: Result<String, ApiError>,
) -> Result<Json<ResultBody>, ApiError> {
    match outcome {
        Ok(result) => {
            metrics::record_request(operation, 200, start);
            Ok(Json(ResultBody { result }))
        }
        Err(err) => {
            tracing::warn!(
                operation = operation,
                status = err.status.as_u16(),
                reason = %err.message,
                "Request rejected"
            );
            metrics::record_request(operation, err.status.as_u16(), start);
            Err(err)
        }
    }
}
