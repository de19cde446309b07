//! Error types for the chat widget.

use crate::state::ConversationPhase;

/// Errors from the widget state machine.
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error("invalid phase transition: {from} -> {to}")]
    InvalidTransition {
        from: ConversationPhase,
        to: ConversationPhase,
    },
}

/// Errors talking to the relay endpoint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("invalid relay URL: {0}")]
    InvalidUrl(String),
    #[error("relay returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("relay unreachable: {0}")]
    Network(String),
    #[error("could not encode request: {0}")]
    Encode(String),
}

impl TransportError {
    /// HTTP status of the failed call, when the relay answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::Status {
            status: 401,
            message: "bad request".into(),
        };
        assert_eq!(err.to_string(), "relay returned 401: bad request");
        assert_eq!(err.status(), Some(401));

        let err = TransportError::Network("connection refused".into());
        assert_eq!(err.to_string(), "relay unreachable: connection refused");
        assert_eq!(err.status(), None);

        assert_eq!(
            TransportError::InvalidUrl("nope".into()).to_string(),
            "invalid relay URL: nope"
        );
    }

    #[test]
    fn test_widget_error_display() {
        let err = WidgetError::InvalidTransition {
            from: ConversationPhase::Idle,
            to: ConversationPhase::Ended,
        };
        assert_eq!(err.to_string(), "invalid phase transition: Idle -> Ended");
    }
}
