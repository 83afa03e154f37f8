// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! upem-core: shared building blocks for the UniFi Protect event manager
//!
//! This crate provides:
//! - A clock abstraction for testable wall-clock time
//! - Process-wide configuration loaded from environment-style variables
//! - Event window and export job types
//! - The in-memory event store and one-shot timers

pub mod clock;
pub mod config;
pub mod event;
pub mod store;
pub mod timer;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{Config, ConfigError, Credentials, EventDefaults, RetryPolicy};
pub use event::{
    format_timestamp, EventReport, EventWindow, ExportJob, Timestamp, FOLDER_FORMAT,
    TIMESTAMP_FORMAT,
};
pub use store::EventStore;
pub use timer::TimerHandle;
