//! Common types used across the application

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Persisted hourly bucket record
///
/// Timestamps are Unix milliseconds. `hour_start_time` and `last_update` are
/// informational; only the step fields feed the hourly count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourState {
    /// Lifetime counter value at the start of the tracked hour (`None` = no baseline yet)
    pub hour_start_steps: Option<i64>,
    /// When the baseline was set
    pub hour_start_time: Option<i64>,
    /// Most recent lifetime counter value
    pub current_steps: i64,
    /// When the most recent reading was processed
    pub last_update: Option<i64>,
    /// Wall-clock hour (0-23) the baseline applies to (`None` before first initialization)
    pub current_hour: Option<u32>,
}

impl HourState {
    /// Steps since the baseline, floored at zero
    pub fn hourly_steps(&self) -> i64 {
        let baseline = self.hour_start_steps.unwrap_or(0);
        self.current_steps.saturating_sub(baseline).max(0)
    }

    pub fn phase(&self) -> BaselinePhase {
        match self.hour_start_steps {
            Some(_) => BaselinePhase::HasBaseline,
            None => BaselinePhase::NoBaseline,
        }
    }
}

/// Whether a baseline exists for the tracked hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BaselinePhase {
    NoBaseline,
    HasBaseline,
}

/// A single observation from the lifetime step counter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepEvent {
    /// Lifetime counter value reported by the hardware
    pub total_steps: i64,
    /// Wall-clock time of the observation
    pub timestamp: DateTime<Local>,
}

impl StepEvent {
    pub fn new(total_steps: i64, timestamp: DateTime<Local>) -> Self {
        Self {
            total_steps,
            timestamp,
        }
    }

    /// Observation stamped with the current time
    pub fn now(total_steps: i64) -> Self {
        Self::new(total_steps, Local::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hourly_steps_without_baseline() {
        let state = HourState {
            current_steps: 420,
            ..Default::default()
        };
        assert_eq!(state.hourly_steps(), 420);
        assert_eq!(state.phase(), BaselinePhase::NoBaseline);
    }

    #[test]
    fn test_hourly_steps_floored_at_zero() {
        let state = HourState {
            hour_start_steps: Some(5000),
            current_steps: 12,
            ..Default::default()
        };
        assert_eq!(state.hourly_steps(), 0);
        assert_eq!(state.phase(), BaselinePhase::HasBaseline);
    }

    #[test]
    fn test_hourly_steps_extreme_values() {
        let state = HourState {
            hour_start_steps: Some(i64::MIN),
            current_steps: i64::MAX,
            ..Default::default()
        };
        assert_eq!(state.hourly_steps(), i64::MAX);
    }
}
