// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lossless video concatenation adapters

mod ffmpeg;

pub use ffmpeg::FfmpegConcatAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ConcatCall, FakeConcatAdapter};

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from concat operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConcatError {
    #[error("launch failed: {0}")]
    Launch(String),
    #[error("concatenation exited with {code}: {stderr}")]
    Failed { code: i32, stderr: String },
}

/// Build a concat manifest listing `inputs` in order
///
/// Each line is `file '<path>'`; single quotes inside a path are escaped the
/// way the concat demuxer expects.
pub fn manifest_contents(inputs: &[PathBuf]) -> String {
    inputs
        .iter()
        .map(|p| format!("file '{}'\n", p.display().to_string().replace('\'', r"'\''")))
        .collect()
}

/// Adapter for the concatenation tool
#[async_trait]
pub trait ConcatAdapter: Clone + Send + Sync + 'static {
    /// Join the files listed in `manifest` into `output` without re-encoding
    async fn concat(&self, manifest: &Path, output: &Path) -> Result<(), ConcatError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
