//! Route handler functions.
//!
//! `prompt` is the relay itself. `health` and `widget` are small helpers for
//! operators and for serving the browser chat widget.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use parlance_core::{Extraction, RequestType, UpstreamPayload};

use crate::error::RelayError;
use crate::state::AppState;
use crate::validation::validate_prompt_request;

/// Self-contained browser widget served at `/`.
pub const WIDGET_HTML: &str = include_str!("../assets/widget.html");

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// POST /api/prompt - relay one widget turn to the upstream dialogue service.
///
/// 200 with the agent's text, or 200 with an empty body when the upstream
/// conversation ended. Errors are plain text; see [`RelayError`].
pub async fn prompt(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<String, RelayError> {
    let body = body.map_err(|rejection| {
        let err = RelayError::Internal(rejection.body_text());
        tracing::error!(error = %err, "Failed to read prompt request body");
        err
    })?;

    let value: Value = serde_json::from_slice(&body).map_err(|e| {
        let err = RelayError::Internal(format!("Invalid JSON body: {e}"));
        tracing::error!(error = %err, "Failed to parse prompt request body");
        err
    })?;

    let request = validate_prompt_request(value).map_err(|report| {
        tracing::warn!(fields = ?report.paths(), "Rejected prompt request: {}", report);
        RelayError::Validation(report)
    })?;

    let raw = state.dialogue.interact(&request).await.map_err(|err| {
        tracing::warn!(
            session_id = %request.id,
            status = err.status().as_u16(),
            kind = err.kind(),
            "{}",
            err
        );
        err
    })?;

    let payload = match UpstreamPayload::from_slice(raw.as_bytes()) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!(session_id = %request.id, error = %e, payload = %raw, "Upstream reply is not a trace list");
            return Err(RelayError::UnparseablePayload(raw));
        }
    };

    match payload.extract() {
        Extraction::Message(message) => {
            if request.request_type == RequestType::Launch {
                tracing::info!(session_id = %request.id, "Conversation started");
            }
            Ok(message.to_string())
        }
        Extraction::Ended { reason } => {
            tracing::info!(session_id = %request.id, reason = %reason, "Conversation ended");
            Ok(String::new())
        }
        Extraction::Unrecognized => {
            tracing::error!(session_id = %request.id, payload = %raw, "Unable to parse upstream payload");
            Err(RelayError::UnparseablePayload(raw))
        }
    }
}

/// GET /health - liveness check.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET / - the chat widget.
pub async fn widget() -> impl IntoResponse {
    Html(WIDGET_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widget_html_is_valid_html() {
        assert!(WIDGET_HTML.starts_with("<!DOCTYPE html>"));
        assert!(WIDGET_HTML.contains("</html>"));
    }

    #[test]
    fn widget_html_posts_to_relay() {
        assert!(WIDGET_HTML.contains("/api/prompt"));
        assert!(WIDGET_HTML.contains("requestType"));
    }

    #[test]
    fn widget_html_has_phase_texts() {
        assert!(WIDGET_HTML.contains("Enter your prompt here"));
        assert!(WIDGET_HTML.contains("Please wait for a response..."));
        assert!(WIDGET_HTML.contains("This conversation has ended"));
    }
}
