//! Sensor Error Types

use thiserror::Error;

/// Errors that can occur while producing a reading
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SensorError {
    /// The producer failed to synthesize a value
    #[error("Sensor {sensor} failed to produce a reading: {reason}")]
    Synthesis { sensor: String, reason: String },
}
