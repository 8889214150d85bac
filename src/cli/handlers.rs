//! Subcommand handlers

use std::sync::Arc;
use chrono::Local;
use tracing::{debug, info};

use crate::{
    config::{Command, Config},
    services::{generate, load_last, save_last, SignalKind},
    state::{Countdown, RestoreOutcome},
    storage::{persisted, FileStore, TimerEntry},
    tasks::TokioScheduler,
    utils::{format_mm_ss, shutdown_signal, SystemClock, WallClock},
    view::TerminalView,
};

/// Run the selected subcommand
pub async fn dispatch(config: &Config) -> Result<(), String> {
    match &config.command {
        Command::Signal { kind, duration, .. } => signal_handler(config, *kind, *duration).await,
        Command::Resume => resume_handler(config).await,
        Command::Cancel => cancel_handler(config),
        Command::Status => status_handler(config),
    }
}

fn build_countdown(config: &Config) -> Result<Countdown, String> {
    Ok(Countdown::new(
        FileStore::new(&config.store),
        TerminalView::new("Next signal in"),
        Arc::new(SystemClock),
        Arc::new(TokioScheduler::new()?),
        config.countdown_settings(),
    ))
}

fn print_last_signal(store: &FileStore) {
    match load_last(store) {
        Some(readout) => println!("Last signal: {}", readout),
        None => debug!("No stored signal readout"),
    }
}

/// Watch the countdown until it ends or the process is asked to stop.
/// Stopping leaves the persisted state alone so `resume` can pick it up.
async fn watch_countdown(countdown: &Countdown) -> Result<(), String> {
    tokio::select! {
        result = countdown.wait_until_idle() => {
            let snapshot = result?;
            debug!("Countdown finished: {:?}", snapshot.last_outcome);
        }
        _ = shutdown_signal() => {
            println!();
            info!("Countdown left persisted; run `resume` to continue");
        }
    }
    Ok(())
}

/// Reveal a readout and start the cooldown, unless one is already running
pub async fn signal_handler(config: &Config, kind: SignalKind, duration: u64) -> Result<(), String> {
    let mut store = FileStore::new(&config.store);
    let countdown = build_countdown(config)?;

    if let RestoreOutcome::Resumed(seconds) = countdown.restore_on_init()? {
        println!();
        println!("Signal trigger is cooling down, {} left", format_mm_ss(seconds));
        print_last_signal(&store);
        return Ok(());
    }

    let readout = generate(kind, &mut rand::rng(), Local::now());
    save_last(&mut store, &readout);
    println!("Signal: {}", readout);

    countdown.start(duration)?;
    watch_countdown(&countdown).await
}

/// Resume a countdown persisted by an earlier run
pub async fn resume_handler(config: &Config) -> Result<(), String> {
    let store = FileStore::new(&config.store);
    print_last_signal(&store);

    let countdown = build_countdown(config)?;
    match countdown.restore_on_init()? {
        RestoreOutcome::Resumed(_) => watch_countdown(&countdown).await,
        outcome => {
            debug!("Restore outcome: {:?}", outcome);
            println!("No active countdown");
            Ok(())
        }
    }
}

pub fn cancel_handler(config: &Config) -> Result<(), String> {
    let countdown = build_countdown(config)?;
    countdown.cancel()?;
    println!("Countdown cancelled");
    Ok(())
}

/// Report the persisted countdown without resuming or clearing it
pub fn status_handler(config: &Config) -> Result<(), String> {
    let store = FileStore::new(&config.store);

    match persisted::load_timer(&store) {
        TimerEntry::Valid(entry) => {
            let remaining = entry.remaining_at(SystemClock.now_millis());
            if remaining > 0 {
                println!("Countdown: {} left", format_mm_ss(remaining as u64));
            } else {
                println!("Countdown: expired");
            }
        }
        TimerEntry::Corrupt => println!("Countdown: unreadable, will be discarded on next run"),
        TimerEntry::Absent => println!("Countdown: none"),
    }

    print_last_signal(&store);
    Ok(())
}
