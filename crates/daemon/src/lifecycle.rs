// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: logging, startup, serving, shutdown.

use std::future::Future;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;
use upem_adapters::{
    FfmpegConcatAdapter, ProtectArchiverAdapter, TracedArchiveAdapter, TracedConcatAdapter,
};
use upem_core::{Config, ConfigError, SystemClock};
use upem_engine::{spawn_sweep, EventScheduler, ExportPipeline, Exporter, VideoCombiner};

use crate::http;

/// Scheduler with the concrete clock used by the daemon
pub type DaemonScheduler = EventScheduler<SystemClock>;

/// Export pipeline with concrete adapter types (wrapped with tracing)
pub type DaemonPipeline = ExportPipeline<
    TracedArchiveAdapter<ProtectArchiverAdapter>,
    TracedConcatAdapter<FfmpegConcatAdapter>,
>;

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to bind {0}: {1}")]
    BindFailed(SocketAddr, std::io::Error),

    #[error("Failed to set up logging: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Running daemon state
pub struct Daemon {
    listener: TcpListener,
    scheduler: DaemonScheduler,
    sweep: JoinHandle<()>,
    start_time: Instant,
}

impl Daemon {
    pub fn local_addr(&self) -> Result<SocketAddr, LifecycleError> {
        Ok(self.listener.local_addr()?)
    }

    pub fn scheduler(&self) -> &DaemonScheduler {
        &self.scheduler
    }

    /// Serve the HTTP API until `shutdown` resolves, then shut down
    pub async fn serve<F>(self, shutdown: F) -> Result<(), LifecycleError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = http::router(self.scheduler.clone());
        let served = axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown)
            .await;

        info!("Shutting down daemon...");
        self.sweep.abort();
        let discarded = self.scheduler.shutdown();
        info!(
            discarded,
            uptime_secs = self.start_time.elapsed().as_secs(),
            "Daemon shutdown complete"
        );

        Ok(served?)
    }
}

/// Build the scheduler wired to the real export pipeline
pub fn build_scheduler(config: &Config) -> DaemonScheduler {
    let archive = TracedArchiveAdapter::new(ProtectArchiverAdapter::new(&config.archiver_bin));
    let concat = TracedConcatAdapter::new(FfmpegConcatAdapter::new(&config.ffmpeg_bin));

    let pipeline: DaemonPipeline = ExportPipeline::new(
        Exporter::new(
            archive,
            config.credentials.clone(),
            config.downloads_root.clone(),
            config.retry,
        ),
        VideoCombiner::new(concat, config.keep_split_files),
    );

    EventScheduler::new(SystemClock, config.defaults, Arc::new(pipeline))
}

/// Start the daemon: bind the listener, build the scheduler, start the sweep
pub async fn startup(config: &Config) -> Result<Daemon, LifecycleError> {
    std::fs::create_dir_all(&config.downloads_root)?;

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .map_err(|e| LifecycleError::BindFailed(config.listen_addr, e))?;

    let scheduler = build_scheduler(config);
    let sweep = spawn_sweep(scheduler.clone(), config.log_interval);

    info!(
        downloads = %config.downloads_root.display(),
        "Daemon started"
    );

    Ok(Daemon {
        listener,
        scheduler,
        sweep,
        start_time: Instant::now(),
    })
}

/// Install the global subscriber: stdout, plus `log_path` when given
///
/// The returned guard flushes the file writer and must be held for the
/// lifetime of the process.
pub fn setup_logging(
    log_path: Option<&Path>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match log_path {
        Some(path) => {
            let (dir, file_name) = split_log_path(path)?;
            std::fs::create_dir_all(&dir)?;
            let file_appender = tracing_appender::rolling::never(dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer().with_ansi(false).with_writer(non_blocking);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()
        .map_err(|e| LifecycleError::Logging(e.to_string()))?;

    Ok(guard)
}

fn split_log_path(path: &Path) -> Result<(PathBuf, PathBuf), LifecycleError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| LifecycleError::Logging(format!("not a file path: {}", path.display())))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, PathBuf::from(file_name)))
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
