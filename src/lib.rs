//! Signal Cooldown - signal readouts gated by a resumable countdown
//!
//! This library provides a countdown that survives restarts by persisting
//! its remaining time with a wall-clock timestamp, together with the fake
//! signal readouts it gates.

pub mod cli;
pub mod config;
pub mod services;
pub mod state;
pub mod storage;
pub mod tasks;
pub mod utils;
pub mod view;

// Re-export commonly used types
pub use config::Config;
pub use state::{Countdown, CountdownSettings, RestoreOutcome};
pub use utils::signals::shutdown_signal;
