//! Signal services module
//!
//! Generation of the fake signal readouts revealed by the trigger.

pub mod signal;

// Re-export main items
pub use signal::{generate, load_last, save_last, SignalKind, SignalReadout};
