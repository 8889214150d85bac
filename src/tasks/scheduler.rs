//! Scheduling port and the tokio-backed scheduler

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::{
    runtime::Handle,
    task::AbortHandle,
    time::{interval_at, sleep, Instant, MissedTickBehavior},
};
use tracing::{debug, warn};

/// Callback run by a scheduler
pub type TaskCallback = Box<dyn FnMut() + Send + 'static>;

/// Something that can run callbacks later
pub trait Scheduler: Send + Sync {
    /// Run `callback` every `period`, first after one full period.
    /// A zero period is raised to the shortest one the scheduler supports.
    fn schedule_repeating(&self, period: Duration, callback: TaskCallback) -> ScheduleHandle;

    /// Run `callback` once after `delay`
    fn schedule_once(&self, delay: Duration, callback: TaskCallback) -> ScheduleHandle;
}

/// Cancellation handle for a scheduled callback
#[derive(Debug, Default)]
pub struct ScheduleHandle {
    cancelled: Arc<AtomicBool>,
    abort: Option<AbortHandle>,
}

impl ScheduleHandle {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_abort(mut self, abort: AbortHandle) -> Self {
        self.abort = Some(abort);
        self
    }

    /// Flag checked by schedulers right before firing
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Stop the callback from firing again. Safe to call from inside it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(abort) = &self.abort {
            abort.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// `interval_at` rejects a zero period
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Scheduler that spawns one tokio task per scheduled callback
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    runtime: Handle,
}

impl TokioScheduler {
    /// Bind to the runtime of the calling context
    pub fn new() -> Result<Self, String> {
        let runtime = Handle::try_current()
            .map_err(|e| format!("Tokio scheduler needs a running runtime: {}", e))?;
        Ok(Self { runtime })
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_repeating(&self, period: Duration, mut callback: TaskCallback) -> ScheduleHandle {
        let period = if period.is_zero() {
            warn!("Zero repeat period, using {:?}", MIN_PERIOD);
            MIN_PERIOD
        } else {
            period
        };
        let handle = ScheduleHandle::new();
        let cancelled = handle.cancel_flag();

        let task = self.runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            // A stalled runtime must not replay a burst of ticks
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if cancelled.load(Ordering::SeqCst) {
                    break;
                }
                callback();
            }
            debug!("Repeating task stopped");
        });

        handle.with_abort(task.abort_handle())
    }

    fn schedule_once(&self, delay: Duration, mut callback: TaskCallback) -> ScheduleHandle {
        let handle = ScheduleHandle::new();
        let cancelled = handle.cancel_flag();

        let task = self.runtime.spawn(async move {
            sleep(delay).await;
            if !cancelled.load(Ordering::SeqCst) {
                callback();
            }
        });

        handle.with_abort(task.abort_handle())
    }
}
