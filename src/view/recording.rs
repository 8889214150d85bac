//! View that records what it was asked to show

use std::sync::{Arc, Mutex};

use super::CountdownView;

/// Observable state of a `RecordingView`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    /// Currently shown text, `None` when cleared
    pub display: Option<String>,
    pub trigger_enabled: bool,
    /// Every text shown, in order
    pub shown: Vec<String>,
}

impl Default for ViewSnapshot {
    fn default() -> Self {
        Self {
            display: None,
            trigger_enabled: true,
            shown: Vec::new(),
        }
    }
}

/// Cloneable view; clones observe the same snapshot
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    snapshot: Arc<Mutex<ViewSnapshot>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.snapshot
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub fn display(&self) -> Option<String> {
        self.snapshot().display
    }

    pub fn trigger_enabled(&self) -> bool {
        self.snapshot().trigger_enabled
    }
}

impl CountdownView for RecordingView {
    fn show(&mut self, text: &str) {
        if let Ok(mut s) = self.snapshot.lock() {
            s.display = Some(text.to_string());
            s.shown.push(text.to_string());
        }
    }

    fn clear(&mut self) {
        if let Ok(mut s) = self.snapshot.lock() {
            s.display = None;
        }
    }

    fn set_trigger_enabled(&mut self, enabled: bool) {
        if let Ok(mut s) = self.snapshot.lock() {
            s.trigger_enabled = enabled;
        }
    }
}
