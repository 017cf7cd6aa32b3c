//! Step counter sources
//!
//! Provides abstractions over where lifetime step counter readings come from:
//! - Simulated: a walking pattern generated on a fixed cadence
//! - Reader: a line-oriented feed (stdin, a replay file)

mod reader;
mod simulated;

pub use reader::ReaderStepSource;
pub use simulated::SimulatedStepSource;

use crate::core::{Error, Result, SensorConfig, StepEvent};
use std::io::BufReader;
use std::time::Duration;

/// Step sensor that abstracts over different reading sources
pub struct StepSensor {
    source: Box<dyn StepSource + Send>,
}

impl StepSensor {
    /// Create a sensor from configuration
    pub fn from_config(config: &SensorConfig) -> Result<Self> {
        match config.source.as_str() {
            "simulated" => {
                log::info!("Using simulated step counter");
                Ok(Self::new(SimulatedStepSource::new(
                    Duration::from_millis(config.simulated_interval_ms),
                    config.simulated_steps_per_event,
                )))
            }
            "stdin" => {
                log::info!("Reading step counter values from stdin");
                Ok(Self::new(ReaderStepSource::new(
                    "stdin",
                    BufReader::new(std::io::stdin()),
                )))
            }
            "none" => Err(Error::SensorUnavailable(
                "Step counter disabled in configuration".to_string(),
            )),
            other => Err(Error::SensorUnavailable(format!(
                "Unknown step counter source: {}",
                other
            ))),
        }
    }

    pub fn new<S: StepSource + Send + 'static>(source: S) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// Block until the next reading; `None` once the source is exhausted
    pub fn next_event(&mut self) -> Result<Option<StepEvent>> {
        self.source.next_event()
    }

    /// Get the name of the current source
    pub fn get_source_name(&self) -> &str {
        self.source.name()
    }

    /// Check if readings are simulated (not real measurements)
    pub fn is_simulated(&self) -> bool {
        self.source.is_simulated()
    }
}

/// Trait for step counter sources
pub trait StepSource {
    /// Block until the next reading is available
    fn next_event(&mut self) -> Result<Option<StepEvent>>;

    /// Name of this source
    fn name(&self) -> &str;

    /// Whether readings are simulated
    fn is_simulated(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_source_is_unavailable() {
        let config = SensorConfig {
            source: "none".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            StepSensor::from_config(&config),
            Err(Error::SensorUnavailable(_))
        ));
    }

    #[test]
    fn test_unknown_source_is_unavailable() {
        let config = SensorConfig {
            source: "accelerometer".to_string(),
            ..Default::default()
        };
        assert!(StepSensor::from_config(&config).is_err());
    }

    #[test]
    fn test_simulated_from_config() {
        let config = SensorConfig {
            simulated_interval_ms: 0,
            ..Default::default()
        };
        let mut sensor = StepSensor::from_config(&config).unwrap();
        assert!(sensor.is_simulated());

        let first = sensor.next_event().unwrap().unwrap();
        let second = sensor.next_event().unwrap().unwrap();
        assert!(second.total_steps > first.total_steps);
    }
}
