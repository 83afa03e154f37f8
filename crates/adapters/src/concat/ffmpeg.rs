// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ffmpeg concat-demuxer adapter

use super::{ConcatAdapter, ConcatError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Runs `ffmpeg -f concat -c copy`
#[derive(Clone, Debug)]
pub struct FfmpegConcatAdapter {
    program: PathBuf,
}

impl FfmpegConcatAdapter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for FfmpegConcatAdapter {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait]
impl ConcatAdapter for FfmpegConcatAdapter {
    async fn concat(&self, manifest: &Path, output: &Path) -> Result<(), ConcatError> {
        let result = Command::new(&self.program)
            .args(["-hide_banner", "-loglevel", "error", "-y"])
            .args(["-f", "concat", "-safe", "0", "-i"])
            .arg(manifest)
            .args(["-c", "copy"])
            .arg(output)
            .output()
            .await
            .map_err(|e| ConcatError::Launch(e.to_string()))?;

        if !result.status.success() {
            return Err(ConcatError::Failed {
                code: result.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "ffmpeg_tests.rs"]
mod tests;
