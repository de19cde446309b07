//! Application state shared across all route handlers.
//!
//! The relay keeps no per-session data. AppState only carries read-only
//! configuration and the upstream client, so concurrent requests for
//! different sessions never coordinate.

use std::sync::Arc;
use std::time::Instant;

use parlance_core::config::ParlanceConfig;

use crate::upstream::DialogueService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Validated application configuration.
    pub config: Arc<ParlanceConfig>,
    /// Upstream dialogue service (HTTP in production, fakes in tests).
    pub dialogue: Arc<dyn DialogueService>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: ParlanceConfig, dialogue: Arc<dyn DialogueService>) -> Self {
        Self {
            config: Arc::new(config),
            dialogue,
            start_time: Instant::now(),
        }
    }
}
