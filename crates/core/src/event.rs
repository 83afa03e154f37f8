// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event windows and the export jobs derived from them

use chrono::{DateTime, FixedOffset, TimeDelta};
use serde::Serialize;

/// Wall-clock instant carrying its UTC offset
pub type Timestamp = DateTime<FixedOffset>;

/// Format for timestamps handed to the archive tool and reported to callers
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%z";

/// Format for the per-event folder below the identifier directory
pub const FOLDER_FORMAT: &str = "%Y/%m/%d/%H.%M.%S";

/// Format a timestamp with its offset, e.g. `2024-01-01 10:00:00+0100`
pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// An active event window
///
/// `start_time` is fixed when the window is created; extensions only move
/// `end_time`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventWindow {
    pub identifier: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    /// Empty, or only empty names, selects all cameras
    pub cameras: Vec<String>,
}

impl EventWindow {
    /// Time left until `end_time`; negative once the window has passed
    pub fn remaining(&self, now: Timestamp) -> TimeDelta {
        self.end_time - now
    }

    /// Remaining time in fractional seconds
    pub fn remaining_secs(&self, now: Timestamp) -> f64 {
        let remaining = self.remaining(now);
        remaining
            .num_microseconds()
            .map(|us| us as f64 / 1_000_000.0)
            .unwrap_or_else(|| remaining.num_seconds() as f64)
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.remaining(now) <= TimeDelta::zero()
    }

    /// Build the status report for this window at `now`
    pub fn report(&self, now: Timestamp) -> EventReport {
        if self.is_expired(now) {
            return EventReport::no_event();
        }
        EventReport::Active {
            start_time: format_timestamp(&self.start_time),
            end_time: format_timestamp(&self.end_time),
            remaining_time_seconds: self.remaining_secs(now),
            cameras: self.cameras.clone(),
        }
    }
}

/// Immutable snapshot of a window, taken when its timer fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportJob {
    pub identifier: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub cameras: Vec<String>,
}

impl ExportJob {
    /// True when no specific camera was requested
    pub fn all_cameras(&self) -> bool {
        self.cameras.iter().all(|c| c.is_empty())
    }
}

impl From<EventWindow> for ExportJob {
    fn from(window: EventWindow) -> Self {
        Self {
            identifier: window.identifier,
            start_time: window.start_time,
            end_time: window.end_time,
            cameras: window.cameras,
        }
    }
}

/// Per-identifier status as reported to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventReport {
    Active {
        start_time: String,
        end_time: String,
        remaining_time_seconds: f64,
        cameras: Vec<String>,
    },
    NoEvent {
        status: &'static str,
    },
}

impl EventReport {
    pub const NO_EVENT: &'static str = "no_event";

    pub fn no_event() -> Self {
        Self::NoEvent {
            status: Self::NO_EVENT,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
