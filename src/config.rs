//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};
use clap::{Parser, Subcommand};

use crate::{services::SignalKind, state::CountdownSettings};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "signal-cooldown")]
#[command(about = "Reveal a signal readout, then gate the next one behind a resumable countdown")]
#[command(version)]
pub struct Config {
    /// File holding the persisted countdown and last readout
    #[arg(long, global = true, default_value = ".signal-cooldown.json")]
    pub store: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Reveal a new signal and start the cooldown countdown
    Signal {
        /// Kind of readout to reveal
        #[arg(short, long, value_enum, default_value_t = SignalKind::Blocks)]
        kind: SignalKind,

        /// Cooldown length in seconds
        #[arg(short, long, default_value = "60")]
        duration: u64,

        /// Delay before the countdown becomes visible, in milliseconds
        #[arg(long, default_value = "0")]
        arm_delay_ms: u64,
    },
    /// Resume and watch a countdown left over from a previous run
    Resume,
    /// Cancel the countdown and clear its persisted state
    Cancel,
    /// Show the persisted countdown and last readout without changing them
    Status,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Countdown settings for the selected command
    pub fn countdown_settings(&self) -> CountdownSettings {
        match &self.command {
            Command::Signal { arm_delay_ms, .. } => CountdownSettings {
                arm_delay: Duration::from_millis(*arm_delay_ms),
                ..CountdownSettings::default()
            },
            _ => CountdownSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_defaults() {
        let config = Config::try_parse_from(["signal-cooldown", "signal"]).unwrap();
        assert_eq!(
            config.command,
            Command::Signal { kind: SignalKind::Blocks, duration: 60, arm_delay_ms: 0 }
        );
        assert_eq!(config.store, PathBuf::from(".signal-cooldown.json"));
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.countdown_settings(), CountdownSettings::default());
    }

    #[test]
    fn signal_options_and_global_flags() {
        let config = Config::try_parse_from([
            "signal-cooldown",
            "signal",
            "--kind",
            "multiplier",
            "-d",
            "90",
            "--arm-delay-ms",
            "9100",
            "--store",
            "/tmp/cd.json",
            "-v",
        ])
        .unwrap();

        assert_eq!(
            config.command,
            Command::Signal { kind: SignalKind::Multiplier, duration: 90, arm_delay_ms: 9100 }
        );
        assert_eq!(config.store, PathBuf::from("/tmp/cd.json"));
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.countdown_settings().arm_delay, Duration::from_millis(9100));
    }

    #[test]
    fn other_commands_parse() {
        for (arg, expected) in [("resume", Command::Resume), ("cancel", Command::Cancel), ("status", Command::Status)] {
            let config = Config::try_parse_from(["signal-cooldown", arg]).unwrap();
            assert_eq!(config.command, expected);
        }
    }
}
