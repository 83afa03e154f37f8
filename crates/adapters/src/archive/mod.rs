// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Archive download adapters

mod protect;

pub use protect::ProtectArchiverAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ArchiveCall, FakeArchiveAdapter};

use crate::process::ProcessError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use upem_core::Credentials;

/// Errors from archive operations
///
/// A tool that runs and exits non-zero is not an error; the exit code is
/// returned to the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ArchiveError {
    #[error("launch failed: {0}")]
    Launch(String),
    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("process error: {0}")]
    Process(String),
    #[error("target directory does not exist: {0}")]
    MissingTarget(PathBuf),
}

impl From<ProcessError> for ArchiveError {
    fn from(err: ProcessError) -> Self {
        match err {
            ProcessError::Launch { message, .. } => ArchiveError::Launch(message),
            ProcessError::Timeout { timeout, .. } => ArchiveError::Timeout(timeout),
            ProcessError::Wait { message, .. } => ArchiveError::Process(message),
        }
    }
}

/// One download of an event's footage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRequest {
    pub credentials: Credentials,
    /// Window start, already formatted with its offset
    pub start: String,
    /// Window end, already formatted with its offset
    pub end: String,
    /// `all` or a comma-joined camera list
    pub cameras: String,
    pub target_dir: PathBuf,
}

impl ArchiveRequest {
    /// Arguments for the archive tool, including the target directory
    pub fn args(&self) -> Vec<String> {
        vec![
            "download".to_string(),
            "--address".to_string(),
            self.credentials.address.clone(),
            "--username".to_string(),
            self.credentials.username.clone(),
            "--password".to_string(),
            self.credentials.password.clone(),
            "--start".to_string(),
            self.start.clone(),
            "--end".to_string(),
            self.end.clone(),
            format!("--cameras={}", self.cameras),
            "--no-use-subfolders".to_string(),
            self.target_dir.display().to_string(),
        ]
    }

    /// Printable command line with the password masked
    pub fn display_command(&self, program: &str) -> String {
        let mut args = self.args();
        if let Some(pos) = args.iter().position(|a| a == "--password") {
            if let Some(password) = args.get_mut(pos + 1) {
                *password = "***".to_string();
            }
        }
        std::iter::once(program.to_string())
            .chain(args)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Adapter for the footage archive tool
#[async_trait]
pub trait ArchiveAdapter: Clone + Send + Sync + 'static {
    /// Run one download attempt, returning the tool's exit code
    async fn download(&self, request: &ArchiveRequest, timeout: Duration)
        -> Result<i32, ArchiveError>;
}
