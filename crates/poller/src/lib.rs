//! Station Polling Loop
//!
//! Drives the sample → persist → sleep cycle at a fixed interval until a
//! shutdown signal arrives.

mod polling;

pub use polling::{CycleOutcome, LoopState, PollerConfig, PollerStats, PollingLoop};

use thiserror::Error;

/// Polling loop errors
#[derive(Debug, Error)]
pub enum PollerError {
    /// The polling interval must be positive
    #[error("Invalid polling interval: {0:?}")]
    InvalidInterval(std::time::Duration),
}
