use std::collections::VecDeque;

use crate::{update, ConversationState, Effect, Msg, RelayTransport, ViewModel};

/// Owns the conversation state and runs effects against a relay transport.
///
/// Each `dispatch` runs to quiescence: a submitted prompt is sent and its
/// reply folded back in before the call returns.
pub struct Widget<T: RelayTransport> {
    state: ConversationState,
    transport: T,
    focus_requests: usize,
}

impl<T: RelayTransport> Widget<T> {
    pub fn new(transport: T) -> Self {
        Self::with_state(ConversationState::new(), transport)
    }

    pub fn with_state(state: ConversationState, transport: T) -> Self {
        Self {
            state,
            transport,
            focus_requests: 0,
        }
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn view(&self) -> ViewModel {
        self.state.view()
    }

    /// Number of times the input asked for focus so far.
    pub fn focus_requests(&self) -> usize {
        self.focus_requests
    }

    pub async fn dispatch(&mut self, msg: Msg) {
        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            for effect in effects {
                if let Some(next) = self.run_effect(effect).await {
                    inbox.push_back(next);
                }
            }
        }
    }

    /// Type `text` into the input and submit it.
    pub async fn submit(&mut self, text: impl Into<String>) {
        self.dispatch(Msg::InputChanged(text.into())).await;
        self.dispatch(Msg::Submitted).await;
    }

    pub async fn reset(&mut self) {
        self.dispatch(Msg::ResetClicked).await;
    }

    async fn run_effect(&mut self, effect: Effect) -> Option<Msg> {
        match effect {
            Effect::FocusInput => {
                self.focus_requests += 1;
                None
            }
            Effect::SendPrompt(request) => {
                let session_id = request.id;
                let msg = match self.transport.send(&request).await {
                    Ok(body) => Msg::ReplyReceived { session_id, body },
                    Err(error) => Msg::RelayFailed { session_id, error },
                };
                Some(msg)
            }
        }
    }
}
