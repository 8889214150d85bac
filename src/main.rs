//! Signal Cooldown - reveal a signal, then wait out a persisted countdown
//!
//! This is the main entry point for the signal-cooldown application.

use tracing::{debug, info};

use signal_cooldown::{cli::dispatch, config::Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr so the countdown line on stdout stays intact
    tracing_subscriber::fmt()
        .with_env_filter(format!("signal_cooldown={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting signal-cooldown v{}", env!("CARGO_PKG_VERSION"));
    debug!("Configuration: store={}, command={:?}", config.store.display(), config.command);

    dispatch(&config).await.map_err(anyhow::Error::msg)?;

    debug!("Done");
    Ok(())
}
