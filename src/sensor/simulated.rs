//! Simulated step counter
//!
//! Used when no hardware counter is wired up. Produces a lifetime counter that
//! alternates between walking and standing still.

use crate::core::{Result, StepEvent};
use crate::sensor::StepSource;
use std::time::Duration;

/// Events per walking/resting phase
const PHASE_LENGTH: u64 = 30;

/// Cadence-based step generator
pub struct SimulatedStepSource {
    interval: Duration,
    steps_per_event: i64,
    total_steps: i64,
    emitted: u64,
}

impl SimulatedStepSource {
    pub fn new(interval: Duration, steps_per_event: i64) -> Self {
        Self {
            interval,
            steps_per_event: steps_per_event.max(0),
            total_steps: 0,
            emitted: 0,
        }
    }

    fn is_walking(&self) -> bool {
        (self.emitted / PHASE_LENGTH) % 2 == 0
    }
}

impl StepSource for SimulatedStepSource {
    fn next_event(&mut self) -> Result<Option<StepEvent>> {
        if !self.interval.is_zero() {
            std::thread::sleep(self.interval);
        }

        if self.is_walking() {
            self.total_steps = self.total_steps.saturating_add(self.steps_per_event);
        }
        self.emitted += 1;

        Ok(Some(StepEvent::now(self.total_steps)))
    }

    fn name(&self) -> &str {
        "Simulated step counter"
    }

    fn is_simulated(&self) -> bool {
        true
    }
}
