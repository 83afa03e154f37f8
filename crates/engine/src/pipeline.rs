// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Export pipeline: download the footage, then combine the clips

use crate::combine::VideoCombiner;
use crate::export::{ExportResult, Exporter};
use crate::scheduler::JobRunner;
use async_trait::async_trait;
use upem_adapters::{ArchiveAdapter, ConcatAdapter};
use upem_core::ExportJob;

/// Runs the exporter and then the combiner for every fired event
///
/// The combiner runs even when every export attempt failed, so partial
/// downloads still get combined.
#[derive(Clone)]
pub struct ExportPipeline<A, K> {
    exporter: Exporter<A>,
    combiner: VideoCombiner<K>,
}

impl<A: ArchiveAdapter, K: ConcatAdapter> ExportPipeline<A, K> {
    pub fn new(exporter: Exporter<A>, combiner: VideoCombiner<K>) -> Self {
        Self { exporter, combiner }
    }

    pub async fn execute(&self, job: &ExportJob) -> ExportResult {
        let result = self.exporter.run(job).await;
        if !result.succeeded {
            tracing::warn!(
                event_id = %job.identifier,
                attempts = result.attempts,
                "export failed, combining whatever was downloaded"
            );
        }

        match self.combiner.process(&result.target_dir).await {
            Ok(report) => tracing::info!(
                event_id = %job.identifier,
                folder = %result.target_dir.display(),
                combined = report.combined.len(),
                skipped = report.skipped.len(),
                failed = report.failed.len(),
                deleted = report.deleted.len(),
                "video processing finished"
            ),
            Err(e) => tracing::error!(
                event_id = %job.identifier,
                error = %e,
                "video processing failed"
            ),
        }

        result
    }
}

#[async_trait]
impl<A: ArchiveAdapter, K: ConcatAdapter> JobRunner for ExportPipeline<A, K> {
    async fn run(&self, job: ExportJob) {
        self.execute(&job).await;
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
