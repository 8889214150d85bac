//! Deterministic scheduler driven by a `ManualClock`

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use super::scheduler::{ScheduleHandle, Scheduler, TaskCallback};
use crate::utils::{ManualClock, WallClock};

struct Entry {
    due_ms: i64,
    period_ms: Option<i64>,
    cancelled: Arc<AtomicBool>,
    callback: Arc<Mutex<TaskCallback>>,
}

/// Scheduler whose time only moves when `advance` is called.
///
/// Advancing fires every due callback in due order and moves the paired
/// clock to each firing instant, so code reading the clock from inside a
/// callback sees the same time a real scheduler would give it.
#[derive(Clone)]
pub struct ManualScheduler {
    clock: ManualClock,
    entries: Arc<Mutex<Vec<Entry>>>,
}

impl ManualScheduler {
    pub fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of callbacks still able to fire
    pub fn pending(&self) -> usize {
        self.entries
            .lock()
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| !e.cancelled.load(Ordering::SeqCst))
                    .count()
            })
            .unwrap_or(0)
    }

    /// Move time forward, firing everything that falls due on the way
    pub fn advance(&self, by: Duration) {
        let target = self.clock.now_millis() + by.as_millis() as i64;

        while let Some((due_ms, callback)) = self.next_due(target) {
            self.clock.set(due_ms);
            // The queue lock is released here so the callback may schedule
            // or cancel entries itself.
            if let Ok(mut callback) = callback.lock() {
                (*callback)();
            }
        }

        self.clock.set(target);
    }

    fn next_due(&self, target: i64) -> Option<(i64, Arc<Mutex<TaskCallback>>)> {
        let mut entries = self.entries.lock().ok()?;
        entries.retain(|e| !e.cancelled.load(Ordering::SeqCst));

        let index = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due_ms <= target)
            .min_by_key(|(_, e)| e.due_ms)
            .map(|(i, _)| i)?;

        let entry = &mut entries[index];
        let due_ms = entry.due_ms;
        let callback = Arc::clone(&entry.callback);
        let period_ms = entry.period_ms;

        match period_ms {
            Some(period) => entry.due_ms += period.max(1),
            None => {
                entries.remove(index);
            }
        }

        Some((due_ms, callback))
    }

    fn push(&self, delay: Duration, period: Option<Duration>, callback: TaskCallback) -> ScheduleHandle {
        let handle = ScheduleHandle::new();
        let entry = Entry {
            due_ms: self.clock.now_millis() + delay.as_millis() as i64,
            period_ms: period.map(|p| p.as_millis() as i64),
            cancelled: handle.cancel_flag(),
            callback: Arc::new(Mutex::new(callback)),
        };

        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
        handle
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&self, period: Duration, callback: TaskCallback) -> ScheduleHandle {
        self.push(period, Some(period), callback)
    }

    fn schedule_once(&self, delay: Duration, callback: TaskCallback) -> ScheduleHandle {
        self.push(delay, None, callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn fires_in_due_order_and_moves_clock() {
        let clock = ManualClock::at(0);
        let scheduler = ManualScheduler::new(clock.clone());
        let log = Arc::new(Mutex::new(Vec::new()));

        for (name, delay) in [("late", 300u64), ("early", 100)] {
            let log = Arc::clone(&log);
            let clock = clock.clone();
            scheduler.schedule_once(
                Duration::from_millis(delay),
                Box::new(move || log.lock().unwrap().push((name, clock.now_millis()))),
            );
        }

        scheduler.advance(Duration::from_millis(1_000));
        assert_eq!(*log.lock().unwrap(), vec![("early", 100), ("late", 300)]);
        assert_eq!(clock.now_millis(), 1_000);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn repeating_callback_can_cancel_itself() {
        let clock = ManualClock::at(0);
        let scheduler = ManualScheduler::new(clock);
        let count = Arc::new(AtomicUsize::new(0));
        let slot: Arc<Mutex<Option<ScheduleHandle>>> = Arc::new(Mutex::new(None));

        let handle = {
            let count = Arc::clone(&count);
            let slot = Arc::clone(&slot);
            scheduler.schedule_repeating(
                Duration::from_secs(1),
                Box::new(move || {
                    if count.fetch_add(1, Ordering::SeqCst) + 1 == 3 {
                        if let Some(handle) = slot.lock().unwrap().as_ref() {
                            handle.cancel();
                        }
                    }
                }),
            )
        };
        *slot.lock().unwrap() = Some(handle);

        scheduler.advance(Duration::from_secs(10));
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert_eq!(scheduler.pending(), 0);
    }
}
