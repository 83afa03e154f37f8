// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::archive::{ArchiveAdapter, ArchiveError, ArchiveRequest};
use crate::concat::{ConcatAdapter, ConcatError};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tracing::Instrument;

/// Wrapper that adds tracing to any ArchiveAdapter
#[derive(Clone)]
pub struct TracedArchiveAdapter<A> {
    inner: A,
}

impl<A> TracedArchiveAdapter<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<A: ArchiveAdapter> ArchiveAdapter for TracedArchiveAdapter<A> {
    async fn download(
        &self,
        request: &ArchiveRequest,
        timeout: Duration,
    ) -> Result<i32, ArchiveError> {
        let span = tracing::info_span!(
            "archive.download",
            target_dir = %request.target_dir.display(),
            cameras = %request.cameras,
        );

        async {
            tracing::info!(start = %request.start, end = %request.end, "starting");

            // Precondition: target directory must exist
            if !request.target_dir.is_dir() {
                tracing::error!("target directory does not exist");
                return Err(ArchiveError::MissingTarget(request.target_dir.clone()));
            }

            let start = std::time::Instant::now();
            let result = self.inner.download(request, timeout).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(0) => tracing::info!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    "download finished"
                ),
                Ok(code) => tracing::warn!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    exit_code = code,
                    "download exited non-zero"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "download failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any ConcatAdapter
#[derive(Clone)]
pub struct TracedConcatAdapter<K> {
    inner: K,
}

impl<K> TracedConcatAdapter<K> {
    pub fn new(inner: K) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<K: ConcatAdapter> ConcatAdapter for TracedConcatAdapter<K> {
    async fn concat(&self, manifest: &Path, output: &Path) -> Result<(), ConcatError> {
        let span = tracing::info_span!("concat", output = %output.display());

        async {
            // Precondition: manifest must have been written
            if !manifest.is_file() {
                tracing::error!(manifest = %manifest.display(), "manifest does not exist");
                return Err(ConcatError::Launch(format!(
                    "manifest does not exist: {}",
                    manifest.display()
                )));
            }

            let start = std::time::Instant::now();
            let result = self.inner.concat(manifest, output).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "combined"),
                Err(e) => {
                    tracing::error!(elapsed_ms = elapsed.as_millis() as u64, error = %e, "failed")
                }
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
