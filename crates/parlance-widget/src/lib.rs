//! Chat widget core for Parlance.
//!
//! A pure `update(state, msg) -> (state, effects)` state machine over the
//! conversation transcript, plus the relay transport and an async driver
//! that executes effects. Front ends (the browser page, the terminal client)
//! only render [`ViewModel`]s and feed user actions back in as [`Msg`]s.

pub mod conversation;
pub mod driver;
pub mod effect;
pub mod error;
pub mod msg;
pub mod state;
pub mod transport;
pub mod update;
pub mod view_model;

pub use conversation::{ConversationState, Notice};
pub use driver::Widget;
pub use effect::Effect;
pub use error::{TransportError, WidgetError};
pub use msg::Msg;
pub use state::ConversationPhase;
pub use transport::{HttpRelay, RelayTransport};
pub use update::update;
pub use view_model::ViewModel;
