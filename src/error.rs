//! Error module for the spike monitor.
use std::io;
use thiserror::Error;

/// Error types for the library.
///
/// Contract violations (wrong recording state, bad neuron id, bad range, inconsistent timing)
/// indicate a misuse by the driving simulation and leave the monitor untouched.
/// The remaining variants report environmental failures.
#[derive(Debug, PartialEq, Error)]
pub enum MonitorError {
    /// The operation requires the monitor to be idle, but it is recording.
    #[error("Invalid operation: the monitor of group {group_id} is recording")]
    Recording { group_id: usize },
    /// The operation requires the monitor to be recording, but it is idle.
    #[error("Invalid operation: the monitor of group {group_id} is not recording")]
    NotRecording { group_id: usize },
    /// Error for out of bounds access, e.g., neuron not found in the group.
    #[error("Index out of bounds: neuron {neuron_id} is not in a group of {num_neurons} neurons")]
    NeuronOutOfRange { neuron_id: usize, num_neurons: usize },
    /// Error for an invalid firing-rate range.
    #[error("Invalid firing rate range [{min}, {max}]: bounds must satisfy 0 <= min <= max")]
    InvalidRange { min: f64, max: f64 },
    /// Internal timing bookkeeping is inconsistent.
    #[error("Inconsistent recording times: {0}")]
    InconsistentTiming(String),
    /// The operation is not available in the current event mode.
    #[error("Operation not supported in the current event mode")]
    UnsupportedMode,
    /// The monitored group has no neuron.
    #[error("Group {group_id} has no neuron to monitor")]
    EmptyGroup { group_id: usize },
    /// Error for invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
    /// Error for a malformed spike file header.
    #[error("Invalid spike file header: {0}")]
    InvalidHeader(String),
    /// Error for I/O operations.
    #[error("I/O error: {message}")]
    Io { kind: io::ErrorKind, message: String },
}

impl From<io::Error> for MonitorError {
    fn from(e: io::Error) -> Self {
        MonitorError::Io {
            kind: e.kind(),
            message: e.to_string(),
        }
    }
}
