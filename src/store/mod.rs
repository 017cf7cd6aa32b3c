//! Key-value persistence boundary for the hourly state
//!
//! The accumulator only ever talks to a [`StateStore`]. The durable
//! implementation lives in [`crate::db`]; [`MemoryStore`] backs tests and the
//! `memory` storage backend.

use crate::core::{Error, HourState, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub const KEY_HOUR_START_STEPS: &str = "hour_start_steps";
pub const KEY_HOUR_START_TIME: &str = "hour_start_time";
pub const KEY_CURRENT_STEPS: &str = "current_steps";
pub const KEY_LAST_UPDATE: &str = "last_update";
pub const KEY_CURRENT_HOUR: &str = "current_hour";

/// Narrow read/write interface over integer values addressed by fixed keys
pub trait StateStore: Send {
    /// Read a value, `None` if the key was never written
    fn read(&self, key: &str) -> Result<Option<i64>>;

    /// Write all entries atomically and durably
    fn write_batch(&mut self, entries: &[(&'static str, i64)]) -> Result<()>;

    /// Remove every stored key
    fn clear(&mut self) -> Result<()>;

    /// Replace the whole record: keys not in `entries` end up unset
    fn replace_all(&mut self, entries: &[(&'static str, i64)]) -> Result<()> {
        self.clear()?;
        self.write_batch(entries)
    }

    /// Check whether a key has been written
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.read(key)?.is_some())
    }
}

impl<S: StateStore + ?Sized> StateStore for Box<S> {
    fn read(&self, key: &str) -> Result<Option<i64>> {
        (**self).read(key)
    }

    fn write_batch(&mut self, entries: &[(&'static str, i64)]) -> Result<()> {
        (**self).write_batch(entries)
    }

    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }

    fn replace_all(&mut self, entries: &[(&'static str, i64)]) -> Result<()> {
        (**self).replace_all(entries)
    }

    fn contains(&self, key: &str) -> Result<bool> {
        (**self).contains(key)
    }
}

/// Load every persisted field, treating unreadable or out-of-range values as absent
///
/// Without a valid `current_hour` the other fields cannot be trusted, so the
/// whole record loads as the default.
pub fn load_state<S: StateStore + ?Sized>(store: &S) -> HourState {
    let read = |key: &str| match store.read(key) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Ignoring unreadable '{}': {}", key, e);
            None
        }
    };

    let current_hour = read(KEY_CURRENT_HOUR).and_then(|hour| match u32::try_from(hour) {
        Ok(h) if h < 24 => Some(h),
        _ => {
            log::warn!("Ignoring corrupt stored hour: {}", hour);
            None
        }
    });

    let Some(current_hour) = current_hour else {
        return HourState::default();
    };

    HourState {
        hour_start_steps: read(KEY_HOUR_START_STEPS),
        hour_start_time: read(KEY_HOUR_START_TIME),
        current_steps: read(KEY_CURRENT_STEPS).unwrap_or(0),
        last_update: read(KEY_LAST_UPDATE),
        current_hour: Some(current_hour),
    }
}

/// Entries for every field that is set
pub fn state_entries(state: &HourState) -> Vec<(&'static str, i64)> {
    let mut entries = Vec::with_capacity(5);
    if let Some(hour) = state.current_hour {
        entries.push((KEY_CURRENT_HOUR, i64::from(hour)));
    }
    if let Some(steps) = state.hour_start_steps {
        entries.push((KEY_HOUR_START_STEPS, steps));
    }
    if let Some(time) = state.hour_start_time {
        entries.push((KEY_HOUR_START_TIME, time));
    }
    if let Some(time) = state.last_update {
        entries.push((KEY_LAST_UPDATE, time));
        entries.push((KEY_CURRENT_STEPS, state.current_steps));
    }
    entries
}

/// In-memory store
///
/// Clones share the same map, so a test can drop an accumulator and build a
/// fresh one over the same contents to simulate a process restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, i64>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Write a single raw value, bypassing the failure switch
    pub fn insert(&self, key: &str, value: i64) {
        self.lock().insert(key.to_string(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, i64>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StateStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<i64>> {
        Ok(self.lock().get(key).copied())
    }

    fn write_batch(&mut self, entries: &[(&'static str, i64)]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Storage("memory store rejected write".to_string()));
        }

        let mut map = self.lock();
        for (key, value) in entries {
            map.insert((*key).to_string(), *value);
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Storage("memory store rejected clear".to_string()));
        }

        self.lock().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_loads_defaults() {
        let store = MemoryStore::new();
        assert_eq!(load_state(&store), HourState::default());
    }

    #[test]
    fn test_out_of_range_hour_is_absent() {
        let store = MemoryStore::new();
        store.insert(KEY_CURRENT_HOUR, 24);
        assert_eq!(load_state(&store).current_hour, None);

        store.insert(KEY_CURRENT_HOUR, -1);
        assert_eq!(load_state(&store).current_hour, None);

        store.insert(KEY_CURRENT_HOUR, 23);
        assert_eq!(load_state(&store).current_hour, Some(23));
    }

    #[test]
    fn test_record_with_corrupt_hour_loads_as_default() {
        let store = MemoryStore::new();
        store.insert(KEY_CURRENT_HOUR, 99);
        store.insert(KEY_HOUR_START_STEPS, 10);
        store.insert(KEY_CURRENT_STEPS, 10);
        store.insert(KEY_LAST_UPDATE, 1_000);

        assert_eq!(load_state(&store), HourState::default());
    }

    #[test]
    fn test_replace_all_drops_missing_keys() {
        let mut store = MemoryStore::new();
        store
            .write_batch(&[(KEY_HOUR_START_STEPS, 10), (KEY_CURRENT_HOUR, 3)])
            .unwrap();

        store.replace_all(&[(KEY_CURRENT_HOUR, 12)]).unwrap();
        assert_eq!(store.read(KEY_CURRENT_HOUR).unwrap(), Some(12));
        assert!(!store.contains(KEY_HOUR_START_STEPS).unwrap());
    }

    #[test]
    fn test_entries_skip_unset_fields() {
        let state = HourState {
            current_hour: Some(9),
            hour_start_time: Some(1_000),
            ..Default::default()
        };
        let entries = state_entries(&state);
        assert_eq!(entries, vec![(KEY_CURRENT_HOUR, 9), (KEY_HOUR_START_TIME, 1_000)]);
    }

    #[test]
    fn test_clones_share_contents() {
        let mut store = MemoryStore::new();
        let other = store.clone();

        store.write_batch(&[(KEY_CURRENT_STEPS, 77)]).unwrap();
        assert_eq!(other.read(KEY_CURRENT_STEPS).unwrap(), Some(77));
        assert!(other.contains(KEY_CURRENT_STEPS).unwrap());
        assert!(!other.contains(KEY_HOUR_START_STEPS).unwrap());
    }

    #[test]
    fn test_failing_writes_leave_contents_untouched() {
        let mut store = MemoryStore::new();
        store.write_batch(&[(KEY_CURRENT_STEPS, 1)]).unwrap();

        store.set_fail_writes(true);
        assert!(store.write_batch(&[(KEY_CURRENT_STEPS, 2)]).is_err());
        assert_eq!(store.read(KEY_CURRENT_STEPS).unwrap(), Some(1));

        store.set_fail_writes(false);
        store.write_batch(&[(KEY_CURRENT_STEPS, 3)]).unwrap();
        assert_eq!(store.read(KEY_CURRENT_STEPS).unwrap(), Some(3));
    }
}
