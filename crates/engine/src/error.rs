// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine

use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop the combiner from processing a folder at all
///
/// Failures of a single camera group are not errors; they are recorded in
/// the [`crate::CombineReport`] and the remaining groups still run.
#[derive(Debug, Error)]
pub enum CombineError {
    #[error("cannot read folder {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
