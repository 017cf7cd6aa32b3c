//! Hourly step accounting
//!
//! Converts the monotonically increasing lifetime step counter into a
//! "steps this hour" value. A baseline is captured from the first reading of
//! each wall-clock hour and the hourly count is the latest reading minus that
//! baseline, floored at zero.
//!
//! Rollover is lazy: the tracked hour only advances when a reading arrives in
//! a different hour. Any number of silent hours collapse into one rollover
//! that uses the arriving reading as the new baseline. A counter reset after a
//! device reboot is not detected; it reads as zero until the counter passes
//! the old baseline or the hour rolls over.

use crate::core::{HourState, Result};
use crate::store::{self, StateStore};
use chrono::{DateTime, TimeZone, Timelike};
use std::sync::{Mutex, MutexGuard};

struct Inner<S> {
    state: HourState,
    store: S,
}

/// Maintains [`HourState`] and answers "steps since the start of the tracked hour"
///
/// Updates and reads share one lock, so a reader never sees a new
/// `current_steps` paired with a stale baseline mid-rollover.
pub struct HourlyStepAccumulator<S: StateStore> {
    inner: Mutex<Inner<S>>,
}

impl<S: StateStore> HourlyStepAccumulator<S> {
    /// Load persisted state, creating it on first run
    ///
    /// On first run the tracked hour is taken from `now` and persisted
    /// immediately, with no baseline, replacing whatever partial or corrupt
    /// record was stored. A restored hour is kept as-is even if it is stale;
    /// the next reading corrects it.
    pub fn initialize<Tz: TimeZone>(store: S, now: &DateTime<Tz>) -> Self {
        let mut inner = Inner {
            state: store::load_state(&store),
            store,
        };

        match inner.state.current_hour {
            Some(hour) => {
                log::info!("Restored hour from storage: {}", hour);
            }
            None => {
                let hour = now.hour();
                inner.state.current_hour = Some(hour);
                inner.state.hour_start_time = Some(now.timestamp_millis());
                log::info!("First time initialization for hour: {}", hour);

                let entries = store::state_entries(&inner.state);
                if let Err(e) = inner.store.replace_all(&entries) {
                    log::warn!("Failed to persist initial state, continuing in memory: {}", e);
                }
            }
        }

        Self {
            inner: Mutex::new(inner),
        }
    }

    /// Process one observation of the lifetime counter
    ///
    /// The in-memory state is always updated. `Err` means the durable write
    /// failed; the next successful write re-synchronizes storage.
    pub fn report_reading<Tz: TimeZone>(&self, total_steps: i64, now: &DateTime<Tz>) -> Result<()> {
        let hour = now.hour();
        let now_ms = now.timestamp_millis();

        let mut inner = self.lock();
        let state = &mut inner.state;

        if state.current_hour != Some(hour) {
            log::info!(
                "New hour detected: {} (previous: {:?}), baseline reset to {}",
                hour,
                state.current_hour,
                total_steps
            );
            state.hour_start_steps = Some(total_steps);
            state.hour_start_time = Some(now_ms);
            state.current_hour = Some(hour);
        } else if state.hour_start_steps.is_none() {
            log::debug!("First sensor reading - initializing baseline to: {}", total_steps);
            state.hour_start_steps = Some(total_steps);
            state.hour_start_time = Some(now_ms);
        }

        state.current_steps = total_steps;
        state.last_update = Some(now_ms);

        log::debug!(
            "Steps updated - Total: {}, HourStart: {:?}, Hourly: {}",
            total_steps,
            state.hour_start_steps,
            state.hourly_steps()
        );

        inner.persist().map_err(|e| {
            log::error!("Failed to persist step reading: {}", e);
            e
        })
    }

    /// Steps since the baseline of the tracked hour, never negative
    pub fn hourly_steps(&self) -> i64 {
        self.lock().state.hourly_steps()
    }

    /// Snapshot of the in-memory state
    pub fn state(&self) -> HourState {
        self.lock().state
    }

    fn lock(&self) -> MutexGuard<'_, Inner<S>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<S: StateStore> Inner<S> {
    fn persist(&mut self) -> Result<()> {
        let entries = store::state_entries(&self.state);
        self.store.write_batch(&entries)
    }
}
