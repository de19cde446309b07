//! Parlance relay crate - axum HTTP server, prompt relay, upstream client.
//!
//! Exposes `POST /api/prompt`, which validates a widget request, forwards it
//! to the upstream dialogue service, and flattens the trace list it gets back
//! into a plain-text reply (or an empty body when the conversation ended).

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod upstream;
pub mod validation;

pub use error::RelayError;
pub use routes::create_router;
pub use state::AppState;
pub use upstream::{DialogueService, HttpDialogueClient};
pub use validation::{validate_prompt_request, ValidationIssue, ValidationReport};
