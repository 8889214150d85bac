//! Timer state structure and management

use serde::{Deserialize, Serialize};

use crate::utils::format_mm_ss;

/// Where the countdown is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TimerPhase {
    #[default]
    Idle,
    /// Trigger pressed, waiting out the arming delay before the first second
    Arming,
    Running,
}

/// How the last countdown ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerOutcome {
    Expired,
    Cancelled,
}

/// Countdown state: the time left as of a wall-clock instant
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TimerState {
    pub remaining_seconds: u64,
    /// Epoch milliseconds at which `remaining_seconds` was last persisted
    pub started_at_wall_clock: i64,
    pub running: bool,
}

impl TimerState {
    /// Create an idle timer state
    pub fn idle() -> Self {
        Self::default()
    }

    /// Create a running timer state with `remaining_seconds` left at `now_ms`
    pub fn running(remaining_seconds: u64, now_ms: i64) -> Self {
        Self {
            remaining_seconds,
            started_at_wall_clock: now_ms,
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Get remaining seconds if the timer is running
    pub fn remaining_seconds(&self) -> Option<u64> {
        self.running.then_some(self.remaining_seconds)
    }

    /// Consume one second. Returns `false` once the countdown would drop
    /// below zero, leaving the state untouched.
    pub fn decrement(&mut self, now_ms: i64) -> bool {
        match self.remaining_seconds.checked_sub(1) {
            Some(left) => {
                self.remaining_seconds = left;
                self.started_at_wall_clock = now_ms;
                true
            }
            None => false,
        }
    }

    /// Display text, `MM:SS`
    pub fn display_text(&self) -> String {
        format_mm_ss(self.remaining_seconds)
    }
}

/// Point-in-time view of the countdown published to observers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TimerSnapshot {
    pub phase: TimerPhase,
    pub remaining_seconds: Option<u64>,
    pub last_outcome: Option<TimerOutcome>,
}

impl TimerSnapshot {
    pub fn is_idle(&self) -> bool {
        self.phase == TimerPhase::Idle
    }
}
