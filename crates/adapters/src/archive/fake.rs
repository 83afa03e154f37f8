// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake archive adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ArchiveAdapter, ArchiveError, ArchiveRequest};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Recorded archive call
#[derive(Debug, Clone)]
pub struct ArchiveCall {
    pub request: ArchiveRequest,
    pub timeout: Duration,
}

/// Fake archive adapter with scripted outcomes
///
/// Each call consumes the next scripted outcome; once the script is empty
/// every call succeeds. Calls that "run" (return an exit code) write the
/// configured clip files into the target directory.
#[derive(Clone, Default)]
pub struct FakeArchiveAdapter {
    outcomes: Arc<Mutex<VecDeque<Result<i32, ArchiveError>>>>,
    clips: Arc<Mutex<Vec<String>>>,
    calls: Arc<Mutex<Vec<ArchiveCall>>>,
}

impl FakeArchiveAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the exit codes of the next calls
    pub fn with_exit_codes(self, codes: impl IntoIterator<Item = i32>) -> Self {
        self.outcomes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend(codes.into_iter().map(Ok));
        self
    }

    /// Queue one outcome, error or exit code
    pub fn push_outcome(&self, outcome: Result<i32, ArchiveError>) {
        self.outcomes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(outcome);
    }

    /// File names written into the target directory on every run
    pub fn with_clips(self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.clips
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ArchiveCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl ArchiveAdapter for FakeArchiveAdapter {
    async fn download(
        &self,
        request: &ArchiveRequest,
        timeout: Duration,
    ) -> Result<i32, ArchiveError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(ArchiveCall {
                request: request.clone(),
                timeout,
            });

        let outcome = self
            .outcomes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or(Ok(0));

        if outcome.is_ok() {
            let clips = self.clips.lock().unwrap_or_else(|e| e.into_inner()).clone();
            for name in clips {
                let _ = std::fs::write(request.target_dir.join(name), b"clip");
            }
        }

        outcome
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
