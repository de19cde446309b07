use crate::{ConversationPhase, ConversationState, Effect, Msg, Notice};

/// Pure update function: applies a message to state and returns any effects.
///
/// `FocusInput` is emitted exactly when the awaiting-reply condition flips.
pub fn update(mut state: ConversationState, msg: Msg) -> (ConversationState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::Submitted => {
            if state.phase() != ConversationPhase::Idle || state.input().is_empty() {
                return (state, Vec::new());
            }
            if let Err(e) = state.transition(ConversationPhase::AwaitingReply) {
                tracing::warn!(error = %e, "Submit ignored");
                return (state, Vec::new());
            }
            state.set_notice(None);
            let request = state.take_input_as_prompt();
            vec![Effect::FocusInput, Effect::SendPrompt(request)]
        }
        Msg::ReplyReceived { session_id, body } => {
            if !accepts_reply(&state, session_id) {
                return (state, Vec::new());
            }
            if body.is_empty() {
                if state.transition(ConversationPhase::Ended).is_err() {
                    return (state, Vec::new());
                }
                tracing::info!(session_id = %session_id, "Conversation ended by agent");
            } else {
                if state.transition(ConversationPhase::Idle).is_err() {
                    return (state, Vec::new());
                }
                state.push_agent(body);
            }
            vec![Effect::FocusInput]
        }
        Msg::RelayFailed { session_id, error } => {
            if !accepts_reply(&state, session_id) {
                return (state, Vec::new());
            }
            if state.transition(ConversationPhase::Idle).is_err() {
                return (state, Vec::new());
            }
            tracing::warn!(session_id = %session_id, error = %error, "Relay call failed");
            state.set_notice(Some(Notice::RelayFailed {
                status: error.status(),
                message: error.to_string(),
            }));
            vec![Effect::FocusInput]
        }
        Msg::ResetClicked => {
            let was_awaiting = state.phase().is_awaiting_reply();
            state.reset();
            if was_awaiting {
                vec![Effect::FocusInput]
            } else {
                Vec::new()
            }
        }
    };

    (state, effects)
}

/// A reply is only applied to the conversation it was sent for, and only
/// while that conversation is waiting for one.
fn accepts_reply(state: &ConversationState, session_id: uuid::Uuid) -> bool {
    if session_id != state.session_id() {
        tracing::debug!(
            stale = %session_id,
            current = %state.session_id(),
            "Discarding reply for a previous session"
        );
        return false;
    }
    if !state.phase().is_awaiting_reply() {
        tracing::debug!(phase = %state.phase(), "Discarding unexpected reply");
        return false;
    }
    true
}
