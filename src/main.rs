use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use site_pulse::{api, Monitor, MonitorConfig};

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::INFO.into()))
        .with_ansi(true)
        .init();

    let cli = Cli::parse();
    let config = MonitorConfig::from_file(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;

    let monitor = Monitor::new(config.clone()).context("Failed to build monitor")?;
    let cancel = CancellationToken::new();

    if let Some(port) = config.api_port {
        let table = monitor.state.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = api::start_server(port, table, cancel).await {
                error!("Status endpoint failed: {}", e);
            }
        });
    }

    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
        }
        info!("Shutdown signal received. Stopping monitor...");
        shutdown.cancel();
    });

    if let Err(reason) = monitor.run(cancel).await {
        info!("Monitor exited: {}", reason);
    }

    Ok(())
}
