//! Signal readout generation and persistence

use std::fmt;

use chrono::{DateTime, Duration, TimeZone};
use clap::ValueEnum;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::storage::{persisted, DurableStore};

/// Delay between the reveal and the start of a multiplier window
const WINDOW_LEAD_SECS: i64 = 30;
/// Length of a multiplier window
const WINDOW_LENGTH_SECS: i64 = 60;

/// Which readout to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum SignalKind {
    /// How many blocks to place in a row
    Blocks,
    /// A multiplier range with a time window and a confidence figure
    Multiplier,
}

/// A revealed signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SignalReadout {
    Blocks {
        count: u8,
    },
    Multiplier {
        /// Local `HH:MM:SS` the window opens
        window_start: String,
        window_end: String,
        low: f64,
        high: f64,
        /// Percent
        chance: u8,
    },
}

/// Produce a readout of `kind` as revealed at `now`
pub fn generate<R: Rng, Tz: TimeZone>(kind: SignalKind, rng: &mut R, now: DateTime<Tz>) -> SignalReadout
where
    Tz::Offset: fmt::Display,
{
    match kind {
        SignalKind::Blocks => SignalReadout::Blocks {
            count: rng.random_range(1..=6),
        },
        SignalKind::Multiplier => {
            let start = now + Duration::seconds(WINDOW_LEAD_SECS);
            let end = start.clone() + Duration::seconds(WINDOW_LENGTH_SECS);
            SignalReadout::Multiplier {
                window_start: start.format("%H:%M:%S").to_string(),
                window_end: end.format("%H:%M:%S").to_string(),
                low: round2(rng.random_range(2.0..3.0)),
                high: round2(rng.random_range(4.0..7.0)),
                chance: rng.random_range(86..=97),
            }
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl fmt::Display for SignalReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalReadout::Blocks { count } => write!(f, "Place {} blocks in a row", count),
            SignalReadout::Multiplier { window_start, window_end, low, high, chance } => write!(
                f,
                "{}-{}  {:.2}X - {:.2}X  ({}%)",
                window_start, window_end, low, high, chance
            ),
        }
    }
}

/// Persist `readout` as the last revealed signal
pub fn save_last(store: &mut dyn DurableStore, readout: &SignalReadout) {
    match persisted::save_json(store, persisted::LAST_SIGNAL_KEY, readout) {
        Ok(()) => info!("Saved signal readout: {}", readout),
        Err(e) => warn!("Failed to save signal readout: {}", e),
    }
}

/// Last revealed signal, if one was stored and is readable
pub fn load_last(store: &dyn DurableStore) -> Option<SignalReadout> {
    persisted::load_json(store, persisted::LAST_SIGNAL_KEY)
}
