//! Utility functions module
//!
//! Clocks, display formatting and shutdown signal handling.

pub mod clock;
pub mod format;
pub mod signals;

// Re-export main items
pub use clock::{ManualClock, SystemClock, WallClock};
pub use format::format_mm_ss;
pub use signals::shutdown_signal;
