//! The narrow interface a simulation exposes to its spike monitors.
//!
//! A monitor never drives the simulation. It only asks the simulation for the current time,
//! the size and name of the monitored group, and the spikes the simulation still holds in
//! its buffers. Non-fatal reports go through a [`DiagnosticSink`].
use log::{error, info, warn};
use std::sync::Arc;

use crate::event::AerEvent;
use crate::Time;

/// Destination for non-fatal reports of a monitor.
pub trait DiagnosticSink {
    /// Report an informational message.
    fn info(&self, message: &str);
    /// Report a recoverable anomaly.
    fn warn(&self, message: &str);
    /// Report a failure that the monitor survived.
    fn error(&self, message: &str);
}

/// Diagnostic sink forwarding every report to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl DiagnosticSink for LogDiagnostics {
    fn info(&self, message: &str) {
        info!(target: "spike_monitor", "{}", message);
    }

    fn warn(&self, message: &str) {
        warn!(target: "spike_monitor", "{}", message);
    }

    fn error(&self, message: &str) {
        error!(target: "spike_monitor", "{}", message);
    }
}

/// Capabilities a simulation provides to the monitors of its groups.
pub trait SimContext {
    /// Returns the current simulation time (in ms).
    fn now(&self) -> Time;

    /// Returns the number of neurons in the group.
    fn num_neurons(&self, group_id: usize) -> usize;

    /// Returns a display name for the group.
    fn group_name(&self, group_id: usize) -> String {
        format!("group_{}", group_id)
    }

    /// Drain the spikes of the group the simulation has produced but not yet delivered.
    /// Called by the monitor right before each recording state transition.
    fn flush(&mut self, group_id: usize) -> Vec<AerEvent>;

    /// Returns the sink receiving the non-fatal reports of the monitors.
    fn diagnostics(&self) -> Arc<dyn DiagnosticSink> {
        Arc::new(LogDiagnostics)
    }
}
