// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! UniFi Protect event manager daemon (upemd)
//!
//! Serves the event API and exports footage when event windows end.

use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

use upem_core::Config;
use upem_daemon::{setup_logging, startup};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            // No log file is known yet; report on stdout only
            let _ = setup_logging(None);
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Set up logging
    let _log_guard = setup_logging(config.log_path.as_deref())?;
    config.log_summary();

    // Start daemon
    let daemon = match startup(&config).await {
        Ok(d) => d,
        Err(e) => {
            error!("Failed to start daemon: {}", e);
            return Err(e.into());
        }
    };

    // Set up signal handlers
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let shutdown = async move {
        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
            _ = sigint.recv() => info!("Received SIGINT, shutting down..."),
        }
    };

    info!("Daemon ready, listening on {}", daemon.local_addr()?);

    daemon.serve(shutdown).await?;

    info!("Daemon stopped");
    Ok(())
}
