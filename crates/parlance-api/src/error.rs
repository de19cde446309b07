//! Relay error taxonomy and plain-text error responses.
//!
//! Every variant is terminal for the request: nothing is retried. The widget
//! reads bodies as text, so errors are rendered as `text/plain` rather than
//! JSON.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::validation::ValidationReport;

/// Errors the relay can answer a prompt request with.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// 401 - request body failed the schema.
    #[error("{0}")]
    Validation(ValidationReport),
    /// Upstream answered with a non-success status; that status is mirrored.
    #[error("Encountered error with upstream dialogue service: {reason}")]
    UpstreamStatus { status: u16, reason: String },
    /// 504 - upstream did not answer within the configured timeout.
    #[error("Upstream dialogue service timed out: {0}")]
    UpstreamTimeout(String),
    /// 502 - upstream could not be reached or the reply could not be read.
    #[error("Unable to reach upstream dialogue service: {0}")]
    UpstreamUnreachable(String),
    /// 500 - upstream replied, but with no recognizable trace.
    #[error("Unable to parse upstream payload: {0}")]
    UnparseablePayload(String),
    /// 500 - anything else that went wrong before the upstream call.
    #[error("{0}")]
    Internal(String),
}

impl RelayError {
    /// Map a reqwest failure that happened before a status was available.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RelayError::UpstreamTimeout(err.to_string())
        } else {
            RelayError::UpstreamUnreachable(err.to_string())
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::Validation(_) => StatusCode::UNAUTHORIZED,
            RelayError::UpstreamStatus { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            RelayError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            RelayError::UpstreamUnreachable(_) => StatusCode::BAD_GATEWAY,
            RelayError::UnparseablePayload(_) | RelayError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Short machine-readable name, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::Validation(_) => "validation",
            RelayError::UpstreamStatus { .. } => "upstream_status",
            RelayError::UpstreamTimeout(_) => "upstream_timeout",
            RelayError::UpstreamUnreachable(_) => "upstream_unreachable",
            RelayError::UnparseablePayload(_) => "unparseable_payload",
            RelayError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationIssue;

    #[test]
    fn test_status_mapping() {
        let report = ValidationReport::new(vec![ValidationIssue::new(
            "too_small",
            &["prompt"],
            "Too small: expected string to have >=1 characters",
        )]);
        assert_eq!(
            RelayError::Validation(report).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            RelayError::UpstreamStatus {
                status: 403,
                reason: "Forbidden".into()
            }
            .status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            RelayError::UpstreamTimeout("slow".into()).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            RelayError::UpstreamUnreachable("refused".into()).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            RelayError::UnparseablePayload("[]".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RelayError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_invalid_upstream_status_falls_back_to_bad_gateway() {
        let err = RelayError::UpstreamStatus {
            status: 42,
            reason: "weird".into(),
        };
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_display_messages() {
        let err = RelayError::UpstreamStatus {
            status: 503,
            reason: "Service Unavailable".into(),
        };
        assert_eq!(
            err.to_string(),
            "Encountered error with upstream dialogue service: Service Unavailable"
        );
        assert_eq!(
            RelayError::UnparseablePayload(r#"[{"type":"speak"}]"#.into()).to_string(),
            r#"Unable to parse upstream payload: [{"type":"speak"}]"#
        );
        assert_eq!(err.kind(), "upstream_status");
    }

    #[test]
    fn test_into_response_is_plain_text() {
        let resp = RelayError::Internal("boom".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let content_type = resp
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(content_type.starts_with("text/plain"));
    }
}
