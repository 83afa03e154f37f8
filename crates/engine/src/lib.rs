// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! UniFi Protect event manager engine
//!
//! The scheduler owns every event window and its expiry timer. When a timer
//! fires, the window is handed to a [`JobRunner`], normally the
//! [`ExportPipeline`] that downloads the footage and then combines the
//! per-camera clips.

mod combine;
mod error;
mod export;
mod pipeline;
mod scheduler;
mod sweep;

pub use combine::{combined_name, parse_clip_name, ClipName, CombineReport, VideoCombiner};
pub use error::CombineError;
pub use export::{camera_selector, target_dir, ExportResult, Exporter};
pub use pipeline::ExportPipeline;
pub use scheduler::{EventScheduler, ExtendKind, ExtendOutcome, JobRunner, MAX_OFFSET_MINUTES};
pub use sweep::spawn_sweep;
