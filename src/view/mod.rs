//! Countdown view module
//!
//! The display surface and trigger the countdown drives, with a terminal
//! implementation for the binary and a recording one for tests.

pub mod recording;
pub mod terminal;

// Re-export main types
pub use recording::{RecordingView, ViewSnapshot};
pub use terminal::TerminalView;

/// Surface the countdown renders into
pub trait CountdownView: Send {
    /// Show `MM:SS` text, replacing what was shown before
    fn show(&mut self, text: &str);

    /// Empty and hide the display
    fn clear(&mut self);

    /// Enable or disable the control that starts a countdown
    fn set_trigger_enabled(&mut self, enabled: bool);
}
