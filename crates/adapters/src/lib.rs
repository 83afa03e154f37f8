// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the external tools: the archive downloader and the video
//! concatenation tool

pub mod archive;
pub mod concat;
pub mod process;
pub mod traced;

pub use archive::{ArchiveAdapter, ArchiveError, ArchiveRequest, ProtectArchiverAdapter};
pub use concat::{ConcatAdapter, ConcatError, FfmpegConcatAdapter};
pub use traced::{TracedArchiveAdapter, TracedConcatAdapter};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use archive::{ArchiveCall, FakeArchiveAdapter};
#[cfg(any(test, feature = "test-support"))]
pub use concat::{ConcatCall, FakeConcatAdapter};
