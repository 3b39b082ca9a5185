//! Firing-rate statistics derived from recorded spikes.
//!
//! The per-neuron rates and their sorted copy are cached and only recomputed when the
//! recorded spikes or the recording time change. The sorted cache depends on the unsorted
//! one, so it is never clean while the unsorted cache is dirty.
use rayon::prelude::*;

use crate::context::DiagnosticSink;
use crate::store::SpikeEventStore;
use crate::{Time, MIN_PARALLEL_NEURONS};

/// Number of milliseconds in one second, rates are expressed in Hz.
const MS_PER_S: f64 = 1000.0;

/// Returns the firing rate (in Hz) of `num_spikes` spikes over `total_time` ms, or 0 for an empty window.
pub fn firing_rate(num_spikes: usize, total_time: Time) -> f64 {
    if total_time <= 0 {
        return 0.0;
    }
    num_spikes as f64 * MS_PER_S / total_time as f64
}

/// Returns the mean firing rate (in Hz) of a population, or 0 for an empty window.
pub fn mean_firing_rate(total_spikes: usize, total_time: Time, num_neurons: usize) -> f64 {
    if total_time <= 0 || num_neurons == 0 {
        return 0.0;
    }
    total_spikes as f64 * MS_PER_S / (total_time as f64 * num_neurons as f64)
}

/// Returns the sample standard deviation of the rates around `mean`.
/// A population with less than two neurons has zero deviation.
pub fn std_firing_rate(rates: &[f64], mean: f64) -> f64 {
    if rates.len() <= 1 {
        return 0.0;
    }
    let sum_sq = rates.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>();
    (sum_sq / (rates.len() - 1) as f64).sqrt()
}

/// Returns the number of sorted rates in `[min, max]`, bounds included.
pub fn count_in_range(sorted_rates: &[f64], min: f64, max: f64) -> usize {
    let lower = sorted_rates.partition_point(|&r| r < min);
    let upper = sorted_rates.partition_point(|&r| r <= max);
    upper.saturating_sub(lower)
}

/// Cached per-neuron firing rates of a group, unsorted and sorted.
#[derive(Debug, PartialEq, Clone)]
pub struct FiringRates {
    rates: Vec<f64>,
    sorted_rates: Vec<f64>,
    rates_dirty: bool,
    sorted_dirty: bool,
}

impl FiringRates {
    /// Create all-zero, dirty caches for `num_neurons` neurons.
    pub fn new(num_neurons: usize) -> Self {
        FiringRates {
            rates: vec![0.0; num_neurons],
            sorted_rates: vec![0.0; num_neurons],
            rates_dirty: true,
            sorted_dirty: true,
        }
    }

    /// Zero both caches and mark them dirty.
    pub fn reset(&mut self) {
        self.rates.iter_mut().for_each(|r| *r = 0.0);
        self.sorted_rates.iter_mut().for_each(|r| *r = 0.0);
        self.invalidate();
    }

    /// Mark both caches dirty.
    pub fn invalidate(&mut self) {
        self.rates_dirty = true;
        self.sorted_dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.rates_dirty
    }

    pub fn is_sorted_dirty(&self) -> bool {
        self.sorted_dirty
    }

    /// Recompute the per-neuron firing rates if necessary.
    pub fn update_rates(
        &mut self,
        store: &SpikeEventStore,
        total_time: Option<Time>,
        diagnostics: &dyn DiagnosticSink,
    ) {
        if !self.rates_dirty {
            return;
        }
        debug_assert!(self.sorted_dirty);

        self.rates.clear();
        match total_time {
            Some(total_time) if total_time > 0 => {
                if store.num_neurons() > MIN_PARALLEL_NEURONS {
                    store
                        .snapshot()
                        .par_iter()
                        .map(|times| firing_rate(times.len(), total_time))
                        .collect_into_vec(&mut self.rates);
                } else {
                    self.rates.extend(
                        store
                            .num_spikes_iter()
                            .map(|num_spikes| firing_rate(num_spikes, total_time)),
                    );
                }
            }
            _ => {
                diagnostics.warn(&format!(
                    "Firing rates computed over a recording time of {} ms, all rates set to zero",
                    total_time.unwrap_or(0)
                ));
                self.rates.resize(store.num_neurons(), 0.0);
            }
        }

        self.rates_dirty = false;
    }

    /// Sort the firing rates if necessary, recomputing them first if they are dirty.
    pub fn update_sorted_rates(
        &mut self,
        store: &SpikeEventStore,
        total_time: Option<Time>,
        diagnostics: &dyn DiagnosticSink,
    ) {
        if !self.sorted_dirty {
            return;
        }
        self.update_rates(store, total_time, diagnostics);

        self.sorted_rates.clone_from(&self.rates);
        self.sorted_rates.sort_by(|a, b| a.total_cmp(b));
        self.sorted_dirty = false;
    }

    /// Returns the per-neuron firing rates, as of the last update.
    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    /// Returns the per-neuron firing rates in ascending order, as of the last update.
    pub fn sorted_rates(&self) -> &[f64] {
        &self.sorted_rates
    }
}
