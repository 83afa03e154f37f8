// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Export executor: download an event's footage with bounded retries

use std::path::{Path, PathBuf};
use tracing::Instrument;
use upem_adapters::{ArchiveAdapter, ArchiveRequest};
use upem_core::{format_timestamp, Credentials, ExportJob, RetryPolicy, FOLDER_FORMAT};

/// Outcome of one export job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    pub identifier: String,
    pub succeeded: bool,
    /// Attempts actually made; zero when the target folder could not be created
    pub attempts: u32,
    pub target_dir: PathBuf,
}

/// Camera selection argument: `all`, or the names joined with commas
pub fn camera_selector(cameras: &[String]) -> String {
    if cameras.iter().all(|c| c.is_empty()) {
        "all".to_string()
    } else {
        cameras.join(",")
    }
}

/// Folder receiving an event's clips:
/// `<root>/<identifier>/<year>/<month>/<day>/<hour>.<minute>.<second>`
///
/// Path separators in the identifier are replaced so the folder always stays
/// below `root`.
pub fn target_dir(root: &Path, job: &ExportJob) -> PathBuf {
    root.join(folder_name(&job.identifier))
        .join(job.start_time.format(FOLDER_FORMAT).to_string())
}

fn folder_name(identifier: &str) -> String {
    match identifier {
        "" | "." | ".." => "_".repeat(identifier.len().max(1)),
        _ => identifier.replace(['/', '\\'], "_"),
    }
}

/// Runs the archive tool for export jobs
#[derive(Clone)]
pub struct Exporter<A> {
    archive: A,
    credentials: Credentials,
    downloads_root: PathBuf,
    retry: RetryPolicy,
}

impl<A: ArchiveAdapter> Exporter<A> {
    pub fn new(
        archive: A,
        credentials: Credentials,
        downloads_root: PathBuf,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            archive,
            credentials,
            downloads_root,
            retry,
        }
    }

    /// Download the job's window, retrying failed attempts
    ///
    /// Never fails: exhausting every attempt is reported through
    /// [`ExportResult::succeeded`]. There is no delay after the last attempt.
    pub async fn run(&self, job: &ExportJob) -> ExportResult {
        let span = tracing::info_span!("export", event_id = %job.identifier);
        self.run_attempts(job).instrument(span).await
    }

    async fn run_attempts(&self, job: &ExportJob) -> ExportResult {
        let dir = target_dir(&self.downloads_root, job);
        let mut result = ExportResult {
            identifier: job.identifier.clone(),
            succeeded: false,
            attempts: 0,
            target_dir: dir.clone(),
        };

        if let Err(e) = tokio::fs::create_dir_all(&dir).await {
            tracing::error!(folder = %dir.display(), error = %e, "cannot create target folder");
            return result;
        }

        let request = ArchiveRequest {
            credentials: self.credentials.clone(),
            start: format_timestamp(&job.start_time),
            end: format_timestamp(&job.end_time),
            cameras: camera_selector(&job.cameras),
            target_dir: dir,
        };
        tracing::info!(cameras = %request.cameras, "running archive command");

        let max_attempts = self.retry.max_attempts.max(1);
        for attempt in 1..=max_attempts {
            result.attempts = attempt;
            match self
                .archive
                .download(&request, self.retry.attempt_timeout)
                .await
            {
                Ok(0) => {
                    tracing::info!(attempt, "export completed successfully");
                    result.succeeded = true;
                    return result;
                }
                Ok(code) => {
                    tracing::error!(attempt, exit_code = code, "archive command failed")
                }
                Err(e) => tracing::error!(attempt, error = %e, "archive command failed"),
            }

            if attempt < max_attempts {
                tracing::info!(
                    attempt,
                    delay_secs = self.retry.delay.as_secs(),
                    "retrying export"
                );
                tokio::time::sleep(self.retry.delay).await;
            }
        }

        tracing::error!(attempts = max_attempts, "export failed after all attempts");
        result
    }
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
