//! Conversation phase with validated transitions.
//!
//! Enforces the widget lifecycle:
//! - Idle -> AwaitingReply (prompt submitted)
//! - AwaitingReply -> Idle (agent replied, or the relay call failed)
//! - AwaitingReply -> Ended (relay returned an empty body)
//!
//! Reset is not a transition: it forces the phase back to Idle from anywhere
//! and is applied through [`crate::ConversationState::reset`].

use std::fmt;

use crate::error::WidgetError;

/// Phase of the chat widget. Exactly one holds at any time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ConversationPhase {
    /// Ready for input.
    #[default]
    Idle,
    /// A prompt is in flight; further submissions are rejected.
    AwaitingReply,
    /// The upstream ended the conversation. Only a reset leaves this phase.
    Ended,
}

impl fmt::Display for ConversationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationPhase::Idle => write!(f, "Idle"),
            ConversationPhase::AwaitingReply => write!(f, "AwaitingReply"),
            ConversationPhase::Ended => write!(f, "Ended"),
        }
    }
}

impl ConversationPhase {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &ConversationPhase) -> bool {
        matches!(
            (self, target),
            (ConversationPhase::Idle, ConversationPhase::AwaitingReply)
                | (ConversationPhase::AwaitingReply, ConversationPhase::Idle)
                | (ConversationPhase::AwaitingReply, ConversationPhase::Ended)
        )
    }

    /// Validate a transition and return the new phase.
    pub fn transition(self, target: ConversationPhase) -> Result<ConversationPhase, WidgetError> {
        if self.can_transition_to(&target) {
            tracing::debug!("Conversation phase: {} -> {}", self, target);
            Ok(target)
        } else {
            Err(WidgetError::InvalidTransition {
                from: self,
                to: target,
            })
        }
    }

    pub fn is_awaiting_reply(&self) -> bool {
        *self == ConversationPhase::AwaitingReply
    }
}

// =============================================================================
// Tests
// =============================================================================
