//! Persisted countdown entries and their fail-open decoding

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::DurableStore;

/// Remaining seconds as of `TIMESTAMP_KEY`
pub const TIME_LEFT_KEY: &str = "timeLeft";
/// Milliseconds since the epoch at which `TIME_LEFT_KEY` was written
pub const TIMESTAMP_KEY: &str = "timestamp";
/// JSON-encoded last signal readout
pub const LAST_SIGNAL_KEY: &str = "lastSignal";

/// A `(remaining, saved_at)` pair read back from the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistedTimer {
    pub remaining_seconds: u64,
    pub saved_at_ms: i64,
}

impl PersistedTimer {
    /// Remaining whole seconds at `now_ms`, truncating partial seconds.
    ///
    /// A timestamp in the future counts as no time elapsed.
    pub fn remaining_at(&self, now_ms: i64) -> i64 {
        let elapsed = now_ms.saturating_sub(self.saved_at_ms).max(0) / 1000;
        i64::try_from(self.remaining_seconds)
            .unwrap_or(i64::MAX)
            .saturating_sub(elapsed)
    }
}

/// What the store holds for the countdown keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEntry {
    /// Neither key is present
    Absent,
    /// Something is present but cannot be used
    Corrupt,
    Valid(PersistedTimer),
}

/// Read the countdown pair
pub fn load_timer(store: &dyn DurableStore) -> TimerEntry {
    let time_left = store.get_item(TIME_LEFT_KEY);
    let timestamp = store.get_item(TIMESTAMP_KEY);

    match (time_left, timestamp) {
        (None, None) => TimerEntry::Absent,
        (Some(time_left), Some(timestamp)) => {
            match (time_left.trim().parse::<u64>(), timestamp.trim().parse::<i64>()) {
                (Ok(remaining_seconds), Ok(saved_at_ms)) => TimerEntry::Valid(PersistedTimer {
                    remaining_seconds,
                    saved_at_ms,
                }),
                _ => {
                    debug!("Unparseable countdown entry: {:?} @ {:?}", time_left, timestamp);
                    TimerEntry::Corrupt
                }
            }
        }
        _ => TimerEntry::Corrupt,
    }
}

/// Overwrite the countdown pair. Failures are logged and swallowed.
pub fn save_timer(store: &mut dyn DurableStore, remaining_seconds: u64, now_ms: i64) {
    // Remaining first: if the timestamp write fails, the new smaller remaining
    // sits next to the older timestamp and under-reports time left
    if let Err(e) = store.set_item(TIME_LEFT_KEY, &remaining_seconds.to_string()) {
        warn!("Failed to persist remaining time: {}", e);
    }
    if let Err(e) = store.set_item(TIMESTAMP_KEY, &now_ms.to_string()) {
        warn!("Failed to persist timestamp: {}", e);
    }
}

/// Remove the countdown pair
pub fn clear_timer(store: &mut dyn DurableStore) {
    for key in [TIME_LEFT_KEY, TIMESTAMP_KEY] {
        if let Err(e) = store.remove_item(key) {
            warn!("Failed to clear {}: {}", key, e);
        }
    }
}

/// Store a value as JSON under `key`
pub fn save_json<T: Serialize>(store: &mut dyn DurableStore, key: &str, value: &T) -> Result<(), String> {
    let json = serde_json::to_string(value)
        .map_err(|e| format!("Failed to encode {}: {}", key, e))?;
    store.set_item(key, &json)
}

/// Read a JSON value; missing or undecodable entries read as `None`
pub fn load_json<T: DeserializeOwned>(store: &dyn DurableStore, key: &str) -> Option<T> {
    let raw = store.get_item(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring corrupt {} entry: {}", key, e);
            None
        }
    }
}
