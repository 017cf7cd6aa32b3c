//! Core module - Configuration, errors, and common types

mod config;
mod error;
mod types;

pub use config::{ComplicationConfig, Config, GeneralConfig, SensorConfig, StorageConfig};
pub use error::{Error, Result};
pub use types::{BaselinePhase, HourState, StepEvent};
