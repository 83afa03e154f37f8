// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake concat adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ConcatAdapter, ConcatError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Recorded concat call
#[derive(Debug, Clone)]
pub struct ConcatCall {
    /// Manifest contents as seen during the call
    pub manifest: String,
    pub manifest_path: PathBuf,
    pub output: PathBuf,
}

/// Fake concat adapter
///
/// Writes an empty output file on success; fails every call once
/// [`FakeConcatAdapter::set_failing`] is enabled.
#[derive(Clone, Default)]
pub struct FakeConcatAdapter {
    failing: Arc<AtomicBool>,
    calls: Arc<Mutex<Vec<ConcatCall>>>,
}

impl FakeConcatAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ConcatCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl ConcatAdapter for FakeConcatAdapter {
    async fn concat(&self, manifest: &Path, output: &Path) -> Result<(), ConcatError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(ConcatCall {
                manifest: std::fs::read_to_string(manifest).unwrap_or_default(),
                manifest_path: manifest.to_path_buf(),
                output: output.to_path_buf(),
            });

        if self.failing.load(Ordering::SeqCst) {
            return Err(ConcatError::Failed {
                code: 1,
                stderr: "fake concat failure".to_string(),
            });
        }

        std::fs::write(output, b"").map_err(|e| ConcatError::Launch(e.to_string()))
    }
}
