//! Terminal rendering of the countdown

use std::io::{self, Write};
use tracing::{debug, warn};

use super::CountdownView;

/// Renders the countdown on a single rewritten stdout line
#[derive(Debug)]
pub struct TerminalView {
    label: String,
    width: usize,
    trigger_enabled: Option<bool>,
}

impl TerminalView {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            width: 0,
            trigger_enabled: None,
        }
    }

    fn write_line(&mut self, line: &str) {
        let mut out = io::stdout().lock();
        let pad = self.width.saturating_sub(line.len());
        let result = write!(out, "\r{}{}", line, " ".repeat(pad)).and_then(|_| out.flush());
        if let Err(e) = result {
            warn!("Failed to write countdown: {}", e);
        }
        self.width = line.len();
    }
}

impl CountdownView for TerminalView {
    fn show(&mut self, text: &str) {
        let line = format!("{} {}", self.label, text);
        self.write_line(&line);
    }

    fn clear(&mut self) {
        if self.width == 0 {
            return;
        }
        self.write_line("");
    }

    fn set_trigger_enabled(&mut self, enabled: bool) {
        let previous = self.trigger_enabled.replace(enabled);
        if enabled && previous == Some(false) {
            println!("Ready for a new signal");
        } else if !enabled {
            debug!("Signal trigger disabled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_blanks_the_previous_line_once() {
        let mut view = TerminalView::new("Next signal in");
        view.clear();
        assert_eq!(view.width, 0);

        view.show("00:42");
        assert_eq!(view.width, "Next signal in 00:42".len());

        view.clear();
        assert_eq!(view.width, 0);
    }

    #[test]
    fn trigger_tracks_last_state() {
        let mut view = TerminalView::new("Next signal in");
        view.set_trigger_enabled(false);
        view.set_trigger_enabled(true);
        assert_eq!(view.trigger_enabled, Some(true));
    }
}
