//! Monitor configuration.
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::MonitorError;
use crate::SPIKES_PER_ROW;

/// How spike events are represented by a monitor.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
pub enum EventMode {
    /// Address event representation: one explicit list of spike times per neuron.
    #[default]
    Aer,
}

/// Configuration of a spike monitor.
///
/// # Examples
///
/// ```rust
/// use spike_monitor::config::{EventMode, MonitorConfig};
///
/// let config: MonitorConfig = serde_json::from_str(r#"{"persistent": true}"#).unwrap();
/// assert!(config.persistent);
/// assert_eq!(config.mode, EventMode::Aer);
/// assert_eq!(config.spikes_per_row, 7);
/// ```
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Accumulate spikes and recording time over successive start/stop cycles.
    pub persistent: bool,
    /// The event representation.
    pub mode: EventMode,
    /// The number of spike times per row in the diagnostic dump.
    pub spikes_per_row: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            persistent: false,
            mode: EventMode::Aer,
            spikes_per_row: SPIKES_PER_ROW,
        }
    }
}

impl MonitorConfig {
    /// Check the configuration values.
    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.spikes_per_row == 0 {
            return Err(MonitorError::Config(
                "spikes_per_row must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Save the configuration to a JSON file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), MonitorError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self)
            .map_err(|e| MonitorError::Config(e.to_string()))?;
        writer.flush()?;
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    /// Missing fields take their default value.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, MonitorError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: MonitorConfig =
            serde_json::from_reader(reader).map_err(|e| MonitorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = MonitorConfig::default();
        assert!(!config.persistent);
        assert_eq!(config.mode, EventMode::Aer);
        assert_eq!(config.spikes_per_row, SPIKES_PER_ROW);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_load_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("monitor.json");

        let config = MonitorConfig {
            persistent: true,
            mode: EventMode::Aer,
            spikes_per_row: 10,
        };
        config.save_to(&path).unwrap();

        let loaded = MonitorConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_invalid_config() {
        let dir = tempdir().unwrap();

        let path = dir.path().join("zero_row.json");
        std::fs::write(&path, r#"{"spikes_per_row": 0}"#).unwrap();
        assert!(matches!(
            MonitorConfig::load_from(&path),
            Err(MonitorError::Config(_))
        ));

        let path = dir.path().join("garbage.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            MonitorConfig::load_from(&path),
            Err(MonitorError::Config(_))
        ));

        assert!(matches!(
            MonitorConfig::load_from(dir.path().join("missing.json")),
            Err(MonitorError::Io {
                kind: std::io::ErrorKind::NotFound,
                ..
            })
        ));
    }
}
