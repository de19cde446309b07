pub mod config;
pub mod error;
pub mod trace;
pub mod types;

pub use config::ParlanceConfig;
pub use error::{ParlanceError, Result};
pub use trace::{Extraction, UpstreamPayload, UpstreamTrace};
pub use types::*;
