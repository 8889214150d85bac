//! Scheduling module
//!
//! The port through which the countdown gets its once-per-second tick, with
//! a tokio implementation for the binary and a manual one for tests.

pub mod manual;
pub mod scheduler;

// Re-export main types
pub use manual::ManualScheduler;
pub use scheduler::{ScheduleHandle, Scheduler, TaskCallback, TokioScheduler};
