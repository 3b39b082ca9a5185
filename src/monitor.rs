//! This module provides the `SpikeMonitor` structure, recording the spikes of one neuron group.
//!
//! A monitor alternates between recording and idle phases. Spikes are pushed while recording,
//! statistics are queried while idle. Any call made in the wrong phase is rejected.
use derivative::Derivative;
use log::debug;
use std::io::Write;
use std::sync::Arc;

use crate::config::{EventMode, MonitorConfig};
use crate::context::{DiagnosticSink, SimContext};
use crate::error::MonitorError;
use crate::event::AerEvent;
use crate::log_writer::SpikeLogWriter;
use crate::rates::{self, FiringRates};
use crate::report::{self, PopulationSummary};
use crate::session::RecordingSession;
use crate::store::SpikeEventStore;
use crate::Time;

/// Records the spikes of a neuron group and derives firing-rate statistics from them.
///
/// # Examples
///
/// ```rust
/// use spike_monitor::config::MonitorConfig;
/// use spike_monitor::context::SimContext;
/// use spike_monitor::event::AerEvent;
/// use spike_monitor::monitor::SpikeMonitor;
///
/// struct Clock(i64);
///
/// impl SimContext for Clock {
///     fn now(&self) -> i64 { self.0 }
///     fn num_neurons(&self, _group_id: usize) -> usize { 2 }
///     fn flush(&mut self, _group_id: usize) -> Vec<AerEvent> { vec![] }
/// }
///
/// let mut clock = Clock(0);
/// let mut monitor = SpikeMonitor::new(&clock, 0, 0, MonitorConfig::default()).unwrap();
///
/// monitor.start_recording(&mut clock).unwrap();
/// monitor.push_aer(0, 100).unwrap();
/// monitor.push_aer(0, 600).unwrap();
/// clock.0 = 1000;
/// monitor.stop_recording(&mut clock).unwrap();
///
/// assert_eq!(monitor.pop_num_spikes().unwrap(), 2);
/// assert_eq!(monitor.neuron_mean_firing_rate(0).unwrap(), 2.0);
/// assert_eq!(monitor.num_silent_neurons().unwrap(), 1);
/// ```
#[derive(Derivative)]
#[derivative(Debug)]
pub struct SpikeMonitor {
    monitor_id: usize,
    group_id: usize,
    group_name: String,
    num_neurons: usize,
    mode: EventMode,
    persistent: bool,
    spikes_per_row: usize,
    store: SpikeEventStore,
    session: RecordingSession,
    firing_rates: FiringRates,
    log_writer: SpikeLogWriter,
    /// Simulation time of the last flush of the group's buffered spikes.
    last_updated: Option<Time>,
    #[derivative(Debug = "ignore")]
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl SpikeMonitor {
    /// Create an idle monitor for the group, sized after the number of neurons the simulation reports.
    pub fn new<C: SimContext>(
        ctx: &C,
        monitor_id: usize,
        group_id: usize,
        config: MonitorConfig,
    ) -> Result<Self, MonitorError> {
        config.validate()?;

        let num_neurons = ctx.num_neurons(group_id);
        if num_neurons == 0 {
            return Err(MonitorError::EmptyGroup { group_id });
        }

        debug!(
            "Spike monitor {} created for group {} ({} neurons)",
            monitor_id,
            group_id,
            num_neurons
        );

        Ok(SpikeMonitor {
            monitor_id,
            group_id,
            group_name: ctx.group_name(group_id),
            num_neurons,
            mode: config.mode,
            persistent: config.persistent,
            spikes_per_row: config.spikes_per_row,
            store: SpikeEventStore::new(num_neurons),
            session: RecordingSession::new(),
            firing_rates: FiringRates::new(num_neurons),
            log_writer: SpikeLogWriter::new(),
            last_updated: None,
            diagnostics: ctx.diagnostics(),
        })
    }

    pub fn monitor_id(&self) -> usize {
        self.monitor_id
    }

    pub fn group_id(&self) -> usize {
        self.group_id
    }

    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    /// Returns the number of neurons in the monitored group.
    pub fn num_neurons(&self) -> usize {
        self.num_neurons
    }

    pub fn mode(&self) -> EventMode {
        self.mode
    }

    /// Change the event representation. Only allowed while idle.
    pub fn set_mode(&mut self, mode: EventMode) -> Result<(), MonitorError> {
        self.check_idle()?;
        self.mode = mode;
        Ok(())
    }

    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Select the accounting discipline, effective from the next recording start.
    pub fn set_persistent(&mut self, persistent: bool) {
        self.persistent = persistent;
    }

    pub fn is_recording(&self) -> bool {
        self.session.is_recording()
    }

    /// Returns the simulation time of the last flush of the group's buffered spikes.
    pub fn last_updated(&self) -> Option<Time> {
        self.last_updated
    }

    fn check_idle(&self) -> Result<(), MonitorError> {
        if self.is_recording() {
            return Err(MonitorError::Recording {
                group_id: self.group_id,
            });
        }
        Ok(())
    }

    fn check_recording(&self) -> Result<(), MonitorError> {
        if !self.is_recording() {
            return Err(MonitorError::NotRecording {
                group_id: self.group_id,
            });
        }
        Ok(())
    }

    fn check_aer(&self) -> Result<(), MonitorError> {
        match self.mode {
            EventMode::Aer => Ok(()),
        }
    }

    /// Delete all recorded spikes and reset all recording times.
    pub fn clear(&mut self) -> Result<(), MonitorError> {
        self.check_idle()?;
        self.store.clear();
        self.session.reset();
        self.firing_rates.reset();
        Ok(())
    }

    /// Open a recording window.
    ///
    /// The spikes the simulation still buffers for the group predate the window: they are
    /// flushed before the monitor starts recording and discarded.
    /// In snapshot mode, all previous data is cleared first.
    pub fn start_recording<C: SimContext>(&mut self, ctx: &mut C) -> Result<(), MonitorError> {
        self.check_idle()?;

        if !self.persistent {
            self.clear()?;
        }

        let stale = ctx.flush(self.group_id);
        if !stale.is_empty() {
            debug!(
                "Discarding {} spikes of group {} emitted before the recording start",
                stale.len(),
                self.group_id
            );
        }

        let now = ctx.now();
        self.last_updated = Some(now);
        self.firing_rates.invalidate();
        self.session.start(now, self.persistent)?;

        debug!(
            "Spike monitor {} started recording group {} at t={} ms",
            self.monitor_id,
            self.group_id,
            now
        );
        Ok(())
    }

    /// Close the recording window.
    ///
    /// The spikes the simulation still buffers for the group belong to the window: they are
    /// flushed and stored before the monitor stops recording.
    /// A stop rejected for its timing flushes nothing.
    pub fn stop_recording<C: SimContext>(&mut self, ctx: &mut C) -> Result<(), MonitorError> {
        self.check_recording()?;
        let now = ctx.now();
        self.session.check_stop(now)?;

        let pending = ctx.flush(self.group_id);
        self.push_events(&pending)?;

        self.last_updated = Some(now);
        let total_time = self.session.stop(now)?;

        debug!(
            "Spike monitor {} stopped recording group {} at t={} ms (total {} ms)",
            self.monitor_id,
            self.group_id,
            now,
            total_time
        );
        Ok(())
    }

    /// Record a spike of the neuron at the given time. Only allowed while recording.
    pub fn push_aer(&mut self, neuron_id: usize, time: Time) -> Result<(), MonitorError> {
        self.check_recording()?;
        self.check_aer()?;
        self.store.push(neuron_id, time)
    }

    /// Record a batch of spikes. Either all spikes are recorded or none is.
    pub fn push_events(&mut self, events: &[AerEvent]) -> Result<(), MonitorError> {
        self.check_recording()?;
        self.check_aer()?;
        events
            .iter()
            .try_for_each(|event| self.store.check_neuron(event.neuron_id()))?;
        events
            .iter()
            .try_for_each(|event| self.store.push(event.neuron_id(), event.time()))
    }

    /// Returns the time the recording started, i.e., the start of the first window in persistent mode.
    pub fn recording_start_time(&self) -> Result<Option<Time>, MonitorError> {
        self.check_idle()?;
        Ok(self.session.start_time())
    }

    /// Returns the time the last recording window started.
    pub fn recording_last_start_time(&self) -> Result<Option<Time>, MonitorError> {
        self.check_idle()?;
        Ok(self.session.last_start_time())
    }

    /// Returns the time the last recording window ended.
    pub fn recording_stop_time(&self) -> Result<Option<Time>, MonitorError> {
        self.check_idle()?;
        Ok(self.session.stop_time())
    }

    /// Returns the total recording time (in ms), accumulated over all windows in persistent mode.
    pub fn recording_total_time(&self) -> Result<Option<Time>, MonitorError> {
        self.check_idle()?;
        Ok(self.session.total_time())
    }

    fn total_time(&self) -> Time {
        self.session.total_time().unwrap_or(0)
    }

    /// Returns the number of spikes of the neuron.
    pub fn neuron_num_spikes(&self, neuron_id: usize) -> Result<usize, MonitorError> {
        self.check_idle()?;
        self.check_aer()?;
        self.store.num_spikes(neuron_id)
    }

    /// Returns the number of spikes of the whole group.
    pub fn pop_num_spikes(&self) -> Result<usize, MonitorError> {
        self.check_idle()?;
        self.check_aer()?;
        Ok(self.store.total_num_spikes())
    }

    /// Returns the firing rate (in Hz) of the neuron, or 0 for an empty recording.
    pub fn neuron_mean_firing_rate(&self, neuron_id: usize) -> Result<f64, MonitorError> {
        let num_spikes = self.neuron_num_spikes(neuron_id)?;
        Ok(rates::firing_rate(num_spikes, self.total_time()))
    }

    /// Returns the mean firing rate (in Hz) of the group, or 0 for an empty recording.
    pub fn pop_mean_firing_rate(&self) -> Result<f64, MonitorError> {
        let num_spikes = self.pop_num_spikes()?;
        Ok(rates::mean_firing_rate(
            num_spikes,
            self.total_time(),
            self.num_neurons,
        ))
    }

    /// Returns the standard deviation (in Hz) of the firing rates of the group, using the sample variance.
    pub fn pop_std_firing_rate(&mut self) -> Result<f64, MonitorError> {
        let mean = self.pop_mean_firing_rate()?;
        if self.total_time() == 0 {
            return Ok(0.0);
        }
        Ok(rates::std_firing_rate(self.all_firing_rates()?, mean))
    }

    /// Returns the firing rate (in Hz) of every neuron, indexed by neuron ID.
    pub fn all_firing_rates(&mut self) -> Result<&[f64], MonitorError> {
        self.check_idle()?;
        self.check_aer()?;
        let total_time = self.session.total_time();
        self.firing_rates
            .update_rates(&self.store, total_time, self.diagnostics.as_ref());
        Ok(self.firing_rates.rates())
    }

    /// Returns the firing rate (in Hz) of every neuron, in ascending order.
    pub fn all_firing_rates_sorted(&mut self) -> Result<&[f64], MonitorError> {
        self.check_idle()?;
        self.check_aer()?;
        let total_time = self.session.total_time();
        self.firing_rates
            .update_sorted_rates(&self.store, total_time, self.diagnostics.as_ref());
        Ok(self.firing_rates.sorted_rates())
    }

    /// Returns the highest firing rate (in Hz) of the group.
    pub fn max_firing_rate(&mut self) -> Result<f64, MonitorError> {
        let sorted = self.all_firing_rates_sorted()?;
        Ok(sorted.last().copied().unwrap_or(0.0))
    }

    /// Returns the lowest firing rate (in Hz) of the group.
    pub fn min_firing_rate(&mut self) -> Result<f64, MonitorError> {
        let sorted = self.all_firing_rates_sorted()?;
        Ok(sorted.first().copied().unwrap_or(0.0))
    }

    /// Returns the number of neurons firing at a rate in `[min, max]` Hz, bounds included.
    pub fn num_neurons_with_firing_rate(
        &mut self,
        min: f64,
        max: f64,
    ) -> Result<usize, MonitorError> {
        self.check_idle()?;
        if !(min >= 0.0 && max >= min) {
            return Err(MonitorError::InvalidRange { min, max });
        }
        let sorted = self.all_firing_rates_sorted()?;
        Ok(rates::count_in_range(sorted, min, max))
    }

    /// Returns the number of neurons that did not fire.
    pub fn num_silent_neurons(&mut self) -> Result<usize, MonitorError> {
        self.num_neurons_with_firing_rate(0.0, 0.0)
    }

    /// Returns the percentage of neurons firing at a rate in `[min, max]` Hz, bounds included.
    pub fn percent_neurons_with_firing_rate(
        &mut self,
        min: f64,
        max: f64,
    ) -> Result<f64, MonitorError> {
        let count = self.num_neurons_with_firing_rate(min, max)?;
        Ok(count as f64 * 100.0 / self.num_neurons as f64)
    }

    /// Returns the percentage of neurons that did not fire.
    pub fn percent_silent_neurons(&mut self) -> Result<f64, MonitorError> {
        self.percent_neurons_with_firing_rate(0.0, 0.0)
    }

    /// Returns the recorded spike times of every neuron, indexed by neuron ID.
    pub fn spike_vector_2d(&self) -> Result<&[Vec<Time>], MonitorError> {
        self.check_idle()?;
        self.check_aer()?;
        Ok(self.store.snapshot())
    }

    /// Returns the lines of the diagnostic dump: a population summary and, if requested,
    /// the rate and spike times of every neuron.
    pub fn report_lines(
        &mut self,
        now: Time,
        print_spike_times: bool,
    ) -> Result<Vec<String>, MonitorError> {
        self.check_idle()?;

        let std_rate = self.pop_std_firing_rate()?;
        let summary = PopulationSummary {
            now,
            group_name: &self.group_name,
            group_id: self.group_id,
            num_spikes: self.store.total_num_spikes(),
            total_time: self.total_time(),
            mean_rate: self.pop_mean_firing_rate()?,
            std_rate,
        };
        let mut lines = vec![summary.line()];

        if print_spike_times && self.mode == EventMode::Aer {
            lines.extend(report::table_header());
            for (neuron_id, spike_times) in self.store.snapshot().iter().enumerate() {
                let rate = rates::firing_rate(spike_times.len(), self.total_time());
                lines.extend(report::neuron_rows(
                    neuron_id,
                    rate,
                    spike_times,
                    self.spikes_per_row,
                ));
            }
        }

        Ok(lines)
    }

    /// Print the diagnostic dump to the diagnostic sink.
    pub fn print<C: SimContext>(
        &mut self,
        ctx: &C,
        print_spike_times: bool,
    ) -> Result<(), MonitorError> {
        let lines = self.report_lines(ctx.now(), print_spike_times)?;
        lines.iter().for_each(|line| self.diagnostics.info(line));
        Ok(())
    }

    /// Bind the sink spikes are logged to and write the file header to it. Only allowed while idle.
    ///
    /// A previously bound sink is closed and replaced. Write failures are reported to the
    /// diagnostic sink and do not affect the monitor.
    pub fn set_spike_file(&mut self, sink: Box<dyn Write>) -> Result<(), MonitorError> {
        self.check_idle()?;

        if let Some(previous) = self.log_writer.bind(sink) {
            self.diagnostics.error(&format!(
                "Spike file of group {} has already been set, replacing it",
                self.group_id
            ));
            drop(previous);
        }

        if let Err(e) = self.log_writer.write_header() {
            self.diagnostics.error(&format!(
                "Failed to write the spike file header of group {}: {}",
                self.group_id, e
            ));
        }
        Ok(())
    }

    /// Returns true if the spike file header has been written to the bound sink.
    pub fn spike_file_header_written(&self) -> bool {
        self.log_writer.header_written()
    }

    /// Returns the bound spike file sink, for appending event data.
    pub fn spike_file_mut(&mut self) -> Option<&mut (dyn Write + 'static)> {
        self.log_writer.sink_mut()
    }
}
