//! Per-neuron storage of recorded spike times.
use crate::error::MonitorError;
use crate::Time;

/// Spike times of every neuron of a group, indexed by neuron ID.
/// Times are kept in arrival order, which is the simulation time order.
#[derive(Debug, PartialEq, Clone)]
pub struct SpikeEventStore {
    spike_times: Vec<Vec<Time>>,
}

impl SpikeEventStore {
    /// Create an empty store for a group of `num_neurons` neurons.
    pub fn new(num_neurons: usize) -> Self {
        SpikeEventStore {
            spike_times: vec![Vec::new(); num_neurons],
        }
    }

    /// Returns the number of neurons covered by the store.
    pub fn num_neurons(&self) -> usize {
        self.spike_times.len()
    }

    /// Check that the neuron belongs to the group.
    pub fn check_neuron(&self, neuron_id: usize) -> Result<(), MonitorError> {
        if neuron_id >= self.num_neurons() {
            return Err(MonitorError::NeuronOutOfRange {
                neuron_id,
                num_neurons: self.num_neurons(),
            });
        }
        Ok(())
    }

    /// Append a spike time to the neuron's spike times.
    pub fn push(&mut self, neuron_id: usize, time: Time) -> Result<(), MonitorError> {
        self.check_neuron(neuron_id)?;
        self.spike_times[neuron_id].push(time);
        Ok(())
    }

    /// Remove all spike times, keeping the number of neurons.
    pub fn clear(&mut self) {
        self.spike_times.iter_mut().for_each(|times| times.clear());
    }

    /// Returns the number of spikes of the neuron.
    pub fn num_spikes(&self, neuron_id: usize) -> Result<usize, MonitorError> {
        self.check_neuron(neuron_id)?;
        Ok(self.spike_times[neuron_id].len())
    }

    /// Returns the number of spikes of the whole group.
    pub fn total_num_spikes(&self) -> usize {
        self.spike_times.iter().map(|times| times.len()).sum()
    }

    /// Returns an iterator over the number of spikes of each neuron.
    pub fn num_spikes_iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.spike_times.iter().map(|times| times.len())
    }

    /// Returns the spike times of the neuron.
    pub fn spike_times(&self, neuron_id: usize) -> Result<&[Time], MonitorError> {
        self.check_neuron(neuron_id)?;
        Ok(&self.spike_times[neuron_id])
    }

    /// Returns the spike times of all neurons.
    pub fn snapshot(&self) -> &[Vec<Time>] {
        &self.spike_times
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_count() {
        let mut store = SpikeEventStore::new(3);
        store.push(0, 10).unwrap();
        store.push(0, 20).unwrap();
        store.push(2, 15).unwrap();
        // No deduplication
        store.push(2, 15).unwrap();

        assert_eq!(store.num_spikes(0).unwrap(), 2);
        assert_eq!(store.num_spikes(1).unwrap(), 0);
        assert_eq!(store.num_spikes(2).unwrap(), 2);
        assert_eq!(store.total_num_spikes(), 4);
        assert_eq!(store.num_spikes_iter().collect::<Vec<_>>(), vec![2, 0, 2]);
        assert_eq!(store.spike_times(2).unwrap(), &[15, 15]);
    }

    #[test]
    fn test_out_of_range() {
        let mut store = SpikeEventStore::new(2);
        assert_eq!(
            store.push(2, 0),
            Err(MonitorError::NeuronOutOfRange {
                neuron_id: 2,
                num_neurons: 2
            })
        );
        assert!(store.num_spikes(5).is_err());
        assert!(store.spike_times(2).is_err());
        assert_eq!(store.total_num_spikes(), 0);
    }

    #[test]
    fn test_clear_keeps_neurons() {
        let mut store = SpikeEventStore::new(4);
        store.push(1, 3).unwrap();
        store.push(3, 8).unwrap();
        store.clear();

        assert_eq!(store.num_neurons(), 4);
        assert_eq!(store.total_num_spikes(), 0);
        assert!(store.snapshot().iter().all(|times| times.is_empty()));
    }
}
