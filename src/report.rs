//! Human-readable dump of a monitor's content.
//! The output is meant for logs, not for parsing.
use itertools::Itertools;

use crate::Time;

/// Population statistics printed on the first line of a report.
#[derive(Debug, PartialEq, Clone)]
pub struct PopulationSummary<'a> {
    pub now: Time,
    pub group_name: &'a str,
    pub group_id: usize,
    pub num_spikes: usize,
    pub total_time: Time,
    pub mean_rate: f64,
    pub std_rate: f64,
}

impl PopulationSummary<'_> {
    pub fn line(&self) -> String {
        format!(
            "(t={:.3}s) SpikeMonitor for group {}({}) has {} spikes in {} ms ({:.2} +/- {:.2} Hz)",
            self.now as f64 / 1000.0,
            self.group_name,
            self.group_id,
            self.num_spikes,
            self.total_time,
            self.mean_rate,
            self.std_rate
        )
    }
}

/// Header rows of the per-neuron table.
pub fn table_header() -> Vec<String> {
    vec![
        "| Neur ID | Rate (Hz) | Spike Times (ms)".to_string(),
        "|- - - - -|- - - - - -|- - - - - - - - - - - - - - - - -- - - - - - - - - - - - -"
            .to_string(),
    ]
}

/// Rows of the per-neuron table for one neuron, with at most `per_row` spike times per row.
/// A neuron without spikes still gets one row.
pub fn neuron_rows(
    neuron_id: usize,
    rate: f64,
    spike_times: &[Time],
    per_row: usize,
) -> Vec<String> {
    let per_row = per_row.max(1);
    let mut rows = spike_times
        .iter()
        .chunks(per_row)
        .into_iter()
        .enumerate()
        .map(|(n, chunk)| {
            let times = chunk.map(|t| format!("{:8}", t)).join("");
            if n == 0 {
                format!("| {:7} | {:9.2} | {}", neuron_id, rate, times)
            } else {
                format!("|         |           | {}", times)
            }
        })
        .collect::<Vec<String>>();

    if rows.is_empty() {
        rows.push(format!("| {:7} | {:9.2} | ", neuron_id, rate));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_line() {
        let summary = PopulationSummary {
            now: 1500,
            group_name: "excit",
            group_id: 2,
            num_spikes: 12,
            total_time: 1000,
            mean_rate: 3.0,
            std_rate: 1.5,
        };
        assert_eq!(
            summary.line(),
            "(t=1.500s) SpikeMonitor for group excit(2) has 12 spikes in 1000 ms (3.00 +/- 1.50 Hz)"
        );
    }

    #[test]
    fn test_neuron_rows_wrap() {
        let times = (1..=9).map(|t| t * 10).collect::<Vec<Time>>();
        let rows = neuron_rows(4, 9.0, &times, 7);

        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("|       4 |      9.00 | "));
        assert!(rows[0].ends_with("      70"));
        assert_eq!(rows[1], "|         |           |       80      90");
    }

    #[test]
    fn test_neuron_rows_exact_multiple() {
        let times = (0..14).collect::<Vec<Time>>();
        assert_eq!(neuron_rows(0, 1.0, &times, 7).len(), 2);
    }

    #[test]
    fn test_neuron_rows_silent() {
        let rows = neuron_rows(12, 0.0, &[], 7);
        assert_eq!(rows, vec!["|      12 |      0.00 | ".to_string()]);
    }
}
