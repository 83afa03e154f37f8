// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! UniFi Protect event manager daemon (upemd)
//!
//! Loads configuration, wires the scheduler to the export pipeline and
//! serves the HTTP API until a shutdown signal arrives.

pub mod http;
pub mod lifecycle;

pub use lifecycle::{setup_logging, startup, Daemon, LifecycleError};
