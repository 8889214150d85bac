//! Resumable countdown controller
//!
//! `Countdown` owns the timer state, the durable store and the view. A
//! scheduler drives its once-per-second tick; after a restart,
//! `restore_on_init` rebuilds the countdown from the persisted
//! `(remaining, timestamp)` pair using the wall-clock delta, so time spent
//! with no process running is never replayed tick by tick.

use std::{
    sync::{Arc, Mutex, MutexGuard, Weak},
    time::Duration,
};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::{TimerOutcome, TimerPhase, TimerSnapshot, TimerState};
use crate::{
    storage::{persisted, DurableStore, TimerEntry},
    tasks::{ScheduleHandle, Scheduler, TaskCallback},
    utils::WallClock,
    view::CountdownView,
};

/// Tunables for a countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownSettings {
    /// Interval between ticks; one tick consumes one second
    pub tick_period: Duration,
    /// Grace period between the trigger and the first visible second
    pub arm_delay: Duration,
}

impl Default for CountdownSettings {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_secs(1),
            arm_delay: Duration::ZERO,
        }
    }
}

/// Result of `Countdown::restore_on_init`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// A persisted countdown was resumed with this many seconds left
    Resumed(u64),
    /// Persisted state was expired or unreadable and has been discarded
    Stale,
    /// Nothing was persisted
    Nothing,
    /// A countdown is already arming or running in this controller
    AlreadyActive,
}

struct Inner {
    state: TimerState,
    phase: TimerPhase,
    last_outcome: Option<TimerOutcome>,
    /// Seconds to run once the arming delay is over
    armed_seconds: u64,
    handle: Option<ScheduleHandle>,
    settings: CountdownSettings,
    store: Box<dyn DurableStore>,
    view: Box<dyn CountdownView>,
    clock: Arc<dyn WallClock>,
    scheduler: Arc<dyn Scheduler>,
    timer_update_tx: watch::Sender<TimerSnapshot>,
    this: Weak<Mutex<Inner>>,
}

/// Countdown controller shared between the caller and scheduled callbacks
#[derive(Clone)]
pub struct Countdown {
    inner: Arc<Mutex<Inner>>,
    /// Keep a receiver alive so snapshot updates never fail to send
    _timer_update_rx: watch::Receiver<TimerSnapshot>,
}

impl Countdown {
    pub fn new(
        store: impl DurableStore + 'static,
        view: impl CountdownView + 'static,
        clock: Arc<dyn WallClock>,
        scheduler: Arc<dyn Scheduler>,
        settings: CountdownSettings,
    ) -> Self {
        let (timer_update_tx, timer_update_rx) = watch::channel(TimerSnapshot::default());

        let inner = Arc::new_cyclic(|this| {
            Mutex::new(Inner {
                state: TimerState::idle(),
                phase: TimerPhase::Idle,
                last_outcome: None,
                armed_seconds: 0,
                handle: None,
                settings,
                store: Box::new(store),
                view: Box::new(view),
                clock,
                scheduler,
                timer_update_tx,
                this: this.clone(),
            })
        });

        Self {
            inner,
            _timer_update_rx: timer_update_rx,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, String> {
        self.inner.lock()
            .map_err(|e| format!("Failed to lock countdown state: {}", e))
    }

    /// Start counting down from `duration_seconds`.
    ///
    /// Returns `Ok(false)` without touching anything if a countdown is
    /// already arming or running; cancel it first.
    pub fn start(&self, duration_seconds: u64) -> Result<bool, String> {
        Ok(self.lock()?.start(duration_seconds))
    }

    /// Stop any countdown, clear the display and the persisted state, and
    /// re-enable the trigger.
    pub fn cancel(&self) -> Result<(), String> {
        self.lock()?.reset(Some(TimerOutcome::Cancelled));
        Ok(())
    }

    /// Resume a persisted countdown if it has time left, otherwise discard it
    pub fn restore_on_init(&self) -> Result<RestoreOutcome, String> {
        Ok(self.lock()?.restore())
    }

    pub fn timer_state(&self) -> Result<TimerState, String> {
        self.lock().map(|inner| inner.state.clone())
    }

    pub fn snapshot(&self) -> Result<TimerSnapshot, String> {
        self.lock().map(|inner| inner.snapshot())
    }

    /// Receive a snapshot after every transition and tick
    pub fn subscribe(&self) -> Result<watch::Receiver<TimerSnapshot>, String> {
        self.lock().map(|inner| inner.timer_update_tx.subscribe())
    }

    /// Wait until the countdown is back to idle and return that snapshot
    pub async fn wait_until_idle(&self) -> Result<TimerSnapshot, String> {
        let mut rx = self.subscribe()?;
        loop {
            let snapshot = rx.borrow_and_update().clone();
            if snapshot.is_idle() {
                return Ok(snapshot);
            }
            rx.changed().await
                .map_err(|e| format!("Countdown updates closed: {}", e))?;
        }
    }
}

impl Inner {
    fn now(&self) -> i64 {
        self.clock.now_millis()
    }

    fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            remaining_seconds: self.state.remaining_seconds(),
            last_outcome: self.last_outcome,
        }
    }

    fn publish(&self) {
        if let Err(e) = self.timer_update_tx.send(self.snapshot()) {
            warn!("Failed to send timer update: {}", e);
        }
    }

    fn stop_schedule(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
    }

    fn persist(&mut self) {
        let now = self.state.started_at_wall_clock;
        persisted::save_timer(self.store.as_mut(), self.state.remaining_seconds, now);
    }

    fn start(&mut self, duration_seconds: u64) -> bool {
        if self.phase != TimerPhase::Idle {
            debug!("Ignoring start while countdown is {:?}", self.phase);
            return false;
        }

        self.last_outcome = None;
        self.view.set_trigger_enabled(false);

        if self.settings.arm_delay.is_zero() {
            info!("Starting countdown for {}s", duration_seconds);
            self.begin_running(duration_seconds);
        } else {
            info!("Arming countdown for {}s, visible in {:?}", duration_seconds, self.settings.arm_delay);
            self.phase = TimerPhase::Arming;
            self.armed_seconds = duration_seconds;
            self.view.clear();
            let callback = self.callback(Inner::finish_arming);
            self.handle = Some(self.scheduler.schedule_once(self.settings.arm_delay, callback));
            self.publish();
        }
        true
    }

    fn finish_arming(&mut self) {
        if self.phase != TimerPhase::Arming {
            return;
        }
        self.handle = None;
        debug!("Arming delay over");
        self.begin_running(self.armed_seconds);
    }

    /// Enter `Running` with `seconds` left as of now
    fn begin_running(&mut self, seconds: u64) {
        self.state = TimerState::running(seconds, self.now());
        self.phase = TimerPhase::Running;
        self.persist();

        self.view.show(&self.state.display_text());
        self.view.set_trigger_enabled(false);

        let callback = self.callback(Inner::tick);
        self.handle = Some(self.scheduler.schedule_repeating(self.settings.tick_period, callback));
        self.publish();
    }

    fn tick(&mut self) {
        if self.phase != TimerPhase::Running {
            return;
        }

        // Another process cleared the pair; writing it back would undo that cancel
        if persisted::load_timer(self.store.as_ref()) == TimerEntry::Absent {
            info!("Persisted countdown removed elsewhere, stopping");
            self.reset(Some(TimerOutcome::Cancelled));
            return;
        }

        let now = self.now();
        if self.state.decrement(now) {
            self.view.show(&self.state.display_text());
            self.persist();
            self.publish();
        } else {
            info!("Countdown expired");
            self.reset(Some(TimerOutcome::Expired));
        }
    }

    /// Return to `Idle`, recording `outcome` if a countdown was active
    fn reset(&mut self, outcome: Option<TimerOutcome>) {
        let was_active = self.phase != TimerPhase::Idle;

        self.stop_schedule();
        self.phase = TimerPhase::Idle;
        self.state = TimerState::idle();
        persisted::clear_timer(self.store.as_mut());

        self.view.clear();
        self.view.set_trigger_enabled(true);

        if was_active {
            if outcome == Some(TimerOutcome::Cancelled) {
                info!("Countdown cancelled");
            }
            self.last_outcome = outcome;
        }
        self.publish();
    }

    fn restore(&mut self) -> RestoreOutcome {
        if self.phase != TimerPhase::Idle {
            return RestoreOutcome::AlreadyActive;
        }

        match persisted::load_timer(self.store.as_ref()) {
            TimerEntry::Absent => {
                debug!("No persisted countdown");
                self.view.set_trigger_enabled(true);
                RestoreOutcome::Nothing
            }
            TimerEntry::Corrupt => {
                warn!("Discarding unreadable persisted countdown");
                self.reset(None);
                RestoreOutcome::Stale
            }
            TimerEntry::Valid(entry) => {
                let remaining = entry.remaining_at(self.now());
                if remaining > 0 {
                    info!("Resuming countdown with {}s left", remaining);
                    self.last_outcome = None;
                    self.begin_running(remaining as u64);
                    RestoreOutcome::Resumed(remaining as u64)
                } else {
                    info!("Persisted countdown already expired ({}s)", remaining);
                    self.reset(None);
                    RestoreOutcome::Stale
                }
            }
        }
    }

    /// Scheduler callback that runs `action` on this controller if it is
    /// still alive
    fn callback(&self, action: fn(&mut Inner)) -> TaskCallback {
        let this = self.this.clone();
        Box::new(move || {
            let Some(inner) = this.upgrade() else {
                return;
            };
            match inner.lock() {
                Ok(mut guard) => action(&mut *guard),
                Err(e) => error!("Failed to lock countdown state: {}", e),
            };
        })
    }
}
