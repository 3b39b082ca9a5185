//! This crate provides tools for recording the spikes of simulated neuron groups and analyzing their firing rates.
//!
//! # Recording Spikes
//!
//! A [`monitor::SpikeMonitor`] is bound to one neuron group of a simulation. The simulation is
//! seen through the [`context::SimContext`] trait: it provides the current time, the size of the
//! group, and the spikes it still buffers when a recording starts or stops.
//!
//! ```rust
//! use spike_monitor::config::MonitorConfig;
//! use spike_monitor::context::SimContext;
//! use spike_monitor::event::AerEvent;
//! use spike_monitor::monitor::SpikeMonitor;
//!
//! struct Sim {
//!     time: i64,
//!     buffer: Vec<AerEvent>,
//! }
//!
//! impl SimContext for Sim {
//!     fn now(&self) -> i64 { self.time }
//!     fn num_neurons(&self, _group_id: usize) -> usize { 3 }
//!     fn flush(&mut self, _group_id: usize) -> Vec<AerEvent> { std::mem::take(&mut self.buffer) }
//! }
//!
//! let mut sim = Sim { time: 0, buffer: vec![] };
//! let config = MonitorConfig { persistent: true, ..MonitorConfig::default() };
//! let mut monitor = SpikeMonitor::new(&sim, 0, 0, config).unwrap();
//!
//! // First window of 500 ms
//! monitor.start_recording(&mut sim).unwrap();
//! monitor.push_aer(0, 120).unwrap();
//! sim.buffer.push(AerEvent::new(2, 499));
//! sim.time = 500;
//! monitor.stop_recording(&mut sim).unwrap();
//!
//! // Second window of 500 ms, accumulated with the first one
//! sim.time = 5000;
//! monitor.start_recording(&mut sim).unwrap();
//! monitor.push_aer(0, 5100).unwrap();
//! monitor.push_aer(0, 5300).unwrap();
//! sim.time = 5500;
//! monitor.stop_recording(&mut sim).unwrap();
//!
//! assert_eq!(monitor.recording_total_time().unwrap(), Some(1000));
//! assert_eq!(monitor.pop_num_spikes().unwrap(), 4);
//! assert_eq!(monitor.all_firing_rates().unwrap(), &[3.0, 0.0, 1.0]);
//! assert_eq!(monitor.num_silent_neurons().unwrap(), 1);
//! ```
//!
//! # Logging Spikes
//!
//! A monitor can be bound to any [`std::io::Write`] sink. A fixed header is written once per
//! sink (see [`log_writer`]), the simulation then appends its event data to it.

pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod log_writer;
pub mod monitor;
pub mod rates;
pub mod report;
pub mod session;
pub mod store;

/// Simulation time, in ms.
pub type Time = i64;

/// The signature at the beginning of every spike file.
pub const SPIKE_FILE_SIGNATURE: i32 = 206661989;
/// The version of the spike file format.
pub const SPIKE_FILE_VERSION: f32 = 1.0;
/// Default number of spike times per row in the diagnostic dump.
pub const SPIKES_PER_ROW: usize = 7;
/// Minimum number of neurons to consider parallel processing.
pub const MIN_PARALLEL_NEURONS: usize = 100;
