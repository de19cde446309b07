use uuid::Uuid;

use parlance_core::ChatMessage;

use crate::{ConversationPhase, ConversationState};

pub const PLACEHOLDER_IDLE: &str = "Enter your prompt here";
pub const PLACEHOLDER_AWAITING: &str = "Please wait for a response...";
pub const PLACEHOLDER_ENDED: &str = "This conversation has ended";
pub const ENDED_BANNER: &str = "No new response from agent - this conversation has ended.";
pub const RESET_LABEL: &str = "Click here to try again!";

/// Render-ready snapshot of the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub session_id: Uuid,
    pub phase: ConversationPhase,
    pub messages: Vec<ChatMessage>,
    pub placeholder: &'static str,
    pub input_enabled: bool,
    /// Typing indicator while a reply is pending.
    pub show_spinner: bool,
    pub show_ended_banner: bool,
    pub notice: Option<String>,
}

impl ViewModel {
    pub fn from_state(state: &ConversationState) -> Self {
        let phase = state.phase();
        let placeholder = match phase {
            ConversationPhase::Idle => PLACEHOLDER_IDLE,
            ConversationPhase::AwaitingReply => PLACEHOLDER_AWAITING,
            ConversationPhase::Ended => PLACEHOLDER_ENDED,
        };
        Self {
            session_id: state.session_id(),
            phase,
            messages: state.transcript().to_vec(),
            placeholder,
            input_enabled: phase == ConversationPhase::Idle,
            show_spinner: phase == ConversationPhase::AwaitingReply,
            show_ended_banner: phase == ConversationPhase::Ended,
            notice: state.notice().map(|n| n.text()),
        }
    }
}
