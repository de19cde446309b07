//! Widget-local conversation state.

use uuid::Uuid;

use parlance_core::{ChatMessage, PromptRequest, RequestType};

use crate::error::WidgetError;
use crate::state::ConversationPhase;
use crate::view_model::ViewModel;

/// Feedback shown next to the input when something went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The last relay call failed; the transcript was left unchanged.
    RelayFailed {
        status: Option<u16>,
        message: String,
    },
}

impl Notice {
    pub fn text(&self) -> String {
        match self {
            Notice::RelayFailed {
                status: Some(status),
                ..
            } => format!("The agent could not be reached ({status}). Please try again."),
            Notice::RelayFailed { status: None, .. } => {
                "The agent could not be reached. Please try again.".to_string()
            }
        }
    }
}

/// Everything the widget knows about the current conversation.
///
/// The transcript is append-only; it is cleared only by [`reset`], which
/// also mints a new session id.
///
/// [`reset`]: ConversationState::reset
#[derive(Debug, Clone)]
pub struct ConversationState {
    session_id: Uuid,
    phase: ConversationPhase,
    transcript: Vec<ChatMessage>,
    input: String,
    notice: Option<Notice>,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationState {
    /// Fresh conversation with a newly minted session id.
    pub fn new() -> Self {
        Self::with_session(Uuid::new_v4())
    }

    pub fn with_session(session_id: Uuid) -> Self {
        Self {
            session_id,
            phase: ConversationPhase::Idle,
            transcript: Vec::new(),
            input: String::new(),
            notice: None,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn phase(&self) -> ConversationPhase {
        self.phase
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn view(&self) -> ViewModel {
        ViewModel::from_state(self)
    }

    pub(crate) fn set_input(&mut self, input: String) {
        self.input = input;
    }

    pub(crate) fn set_notice(&mut self, notice: Option<Notice>) {
        self.notice = notice;
    }

    pub(crate) fn transition(&mut self, target: ConversationPhase) -> Result<(), WidgetError> {
        self.phase = self.phase.transition(target)?;
        Ok(())
    }

    /// Append the pending input as a user message and build its relay request.
    ///
    /// The request kind is decided from the transcript before the append.
    pub(crate) fn take_input_as_prompt(&mut self) -> PromptRequest {
        let request_type = RequestType::for_transcript(self.transcript.is_empty());
        let prompt = std::mem::take(&mut self.input);
        self.transcript.push(ChatMessage::user(prompt.clone()));
        PromptRequest::new(self.session_id, prompt, request_type)
    }

    pub(crate) fn push_agent(&mut self, content: String) {
        self.transcript.push(ChatMessage::agent(content));
    }

    /// Clear the transcript and start over under a new session id.
    pub fn reset(&mut self) {
        let previous = self.session_id;
        let next = Uuid::new_v4();
        tracing::info!(previous = %previous, session_id = %next, "Conversation reset");
        *self = Self::with_session(next);
    }
}
