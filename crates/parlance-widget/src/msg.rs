use uuid::Uuid;

use crate::error::TransportError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the prompt input.
    InputChanged(String),
    /// User submitted the current input.
    Submitted,
    /// Relay answered with 200. An empty body means the conversation ended.
    ReplyReceived { session_id: Uuid, body: String },
    /// Relay call failed (non-success status or transport error).
    RelayFailed {
        session_id: Uuid,
        error: TransportError,
    },
    /// User asked to start over.
    ResetClicked,
}
