//! State management module
//!
//! The countdown state types and the controller that owns them.

pub mod countdown;
pub mod timer_state;

// Re-export main types
pub use countdown::{Countdown, CountdownSettings, RestoreOutcome};
pub use timer_state::{TimerOutcome, TimerPhase, TimerSnapshot, TimerState};
