//! Module implementing the address event representation of a spike.
use crate::Time;

/// A spike emitted by a neuron of the monitored group, in address event representation.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct AerEvent {
    /// The ID of the neuron producing the spike, relative to its group.
    neuron_id: usize,
    /// The time at which the spike is produced (in ms).
    time: Time,
}

impl AerEvent {
    /// Create a new event with the specified parameters.
    pub fn new(neuron_id: usize, time: Time) -> Self {
        AerEvent { neuron_id, time }
    }

    /// Returns the ID of the neuron producing the spike.
    pub fn neuron_id(&self) -> usize {
        self.neuron_id
    }

    /// Returns the time at which the spike is produced.
    pub fn time(&self) -> Time {
        self.time
    }
}

