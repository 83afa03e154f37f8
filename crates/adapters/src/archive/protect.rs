// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `protect-archiver` adapter

use super::{ArchiveAdapter, ArchiveError, ArchiveRequest};
use crate::process::run_streaming;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;

/// Runs `protect-archiver download` as a child process
#[derive(Clone, Debug)]
pub struct ProtectArchiverAdapter {
    program: PathBuf,
}

impl ProtectArchiverAdapter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for ProtectArchiverAdapter {
    fn default() -> Self {
        Self::new("protect-archiver")
    }
}

#[async_trait]
impl ArchiveAdapter for ProtectArchiverAdapter {
    async fn download(
        &self,
        request: &ArchiveRequest,
        timeout: Duration,
    ) -> Result<i32, ArchiveError> {
        tracing::info!(
            "Executing command: {}",
            request.display_command(&self.program.display().to_string())
        );

        let mut command = Command::new(&self.program);
        command.args(request.args());

        Ok(run_streaming(command, timeout).await?)
    }
}

#[cfg(test)]
#[path = "protect_tests.rs"]
mod tests;
