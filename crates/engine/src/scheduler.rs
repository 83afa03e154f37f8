// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event scheduler
//!
//! Owns the event store and arms one expiry timer per identifier. Every
//! caller, timer callbacks included, goes through the same store lock; the
//! lock is never held across an export.

use async_trait::async_trait;
use chrono::TimeDelta;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use upem_core::{
    format_timestamp, timer, Clock, EventDefaults, EventReport, EventStore, EventWindow,
    ExportJob,
};

/// Receives the snapshot of a window whose timer fired
#[async_trait]
pub trait JobRunner: Send + Sync + 'static {
    async fn run(&self, job: ExportJob);
}

/// Whether an extend created a window or moved an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtendKind {
    Started,
    Extended,
}

/// Result of [`EventScheduler::extend`]
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendOutcome {
    pub kind: ExtendKind,
    /// Human-readable status, e.g. `New event front-door started`
    pub message: String,
    pub window: EventWindow,
    /// Delay the expiry timer was armed with
    pub fires_in: Duration,
    /// Window as seen at extend time; reading it never touches the store
    pub report: EventReport,
}

/// Largest window offset accepted, in minutes (one year)
pub const MAX_OFFSET_MINUTES: i64 = 366 * 24 * 60;

/// Offset clamped to `MAX_OFFSET_MINUTES` in either direction
fn minutes(value: i64) -> TimeDelta {
    TimeDelta::minutes(value.clamp(-MAX_OFFSET_MINUTES, MAX_OFFSET_MINUTES))
}

struct Shared<C> {
    store: Mutex<EventStore>,
    clock: C,
    defaults: EventDefaults,
    runner: Arc<dyn JobRunner>,
}

/// Start/extend, cancel and query event windows
///
/// Cloning is cheap; clones share the same store.
pub struct EventScheduler<C: Clock> {
    shared: Arc<Shared<C>>,
}

impl<C: Clock> Clone for EventScheduler<C> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<C: Clock> EventScheduler<C> {
    pub fn new(clock: C, defaults: EventDefaults, runner: Arc<dyn JobRunner>) -> Self {
        Self {
            shared: Arc::new(Shared {
                store: Mutex::new(EventStore::new()),
                clock,
                defaults,
                runner,
            }),
        }
    }

    fn store(&self) -> MutexGuard<'_, EventStore> {
        self.shared
            .store
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    /// Start a new window or push the end of an existing one
    ///
    /// Missing minutes fall back to the configured defaults. Extending keeps
    /// `start_time` and replaces `end_time` and the camera selection. The
    /// previous timer is cancelled and a new one armed for the new end.
    pub fn extend(
        &self,
        identifier: &str,
        past_minutes: Option<i64>,
        future_minutes: Option<i64>,
        cameras: Vec<String>,
    ) -> ExtendOutcome {
        let now = self.shared.clock.now();
        let past = minutes(past_minutes.unwrap_or(self.shared.defaults.past_minutes));
        let future = minutes(future_minutes.unwrap_or(self.shared.defaults.future_minutes));

        let mut store = self.store();

        let (kind, window) = match store.get(identifier) {
            Some(existing) => {
                let mut window = existing.clone();
                window.end_time = now + future;
                window.cameras = cameras;
                (ExtendKind::Extended, window)
            }
            None => {
                let window = EventWindow {
                    identifier: identifier.to_string(),
                    start_time: now - past,
                    end_time: now + future,
                    cameras,
                };
                (ExtendKind::Started, window)
            }
        };

        let message = match kind {
            ExtendKind::Started => format!("New event {} started", identifier),
            ExtendKind::Extended => format!("Event {} extended", identifier),
        };
        tracing::info!(
            event_id = identifier,
            start = %format_timestamp(&window.start_time),
            end = %format_timestamp(&window.end_time),
            "{}",
            message
        );

        let fires_in = window.remaining(now).to_std().unwrap_or(Duration::ZERO);
        let report = window.report(now);
        tracing::info!(
            event_id = identifier,
            delay_secs = fires_in.as_secs_f64(),
            "scheduling export"
        );

        let generation = store.next_generation();
        let scheduler = self.clone();
        let id = identifier.to_string();
        let handle = timer::arm(fires_in, async move {
            scheduler.on_expiry(&id, generation).await;
        });
        store.insert(window.clone(), handle, generation);

        ExtendOutcome {
            kind,
            message,
            window,
            fires_in,
            report,
        }
    }

    /// Cancel the window and its timer
    ///
    /// Returns false when the identifier is unknown; that is not an error.
    pub fn cancel(&self, identifier: &str) -> bool {
        match self.store().remove(identifier) {
            Some(_) => {
                tracing::info!(event_id = identifier, "event cancelled");
                true
            }
            None => {
                tracing::warn!(event_id = identifier, "event was already removed");
                false
            }
        }
    }

    /// Report one window, removing it if it has already ended
    pub fn status(&self, identifier: &str) -> EventReport {
        let now = self.shared.clock.now();
        let mut store = self.store();

        let Some(window) = store.get(identifier) else {
            return EventReport::no_event();
        };
        let report = window.report(now);
        if !report.is_active() {
            store.remove(identifier);
            tracing::info!(event_id = identifier, "removed ended event");
        }
        report
    }

    /// Report every window, removing those that have already ended
    pub fn status_all(&self) -> BTreeMap<String, EventReport> {
        let now = self.shared.clock.now();
        let mut store = self.store();

        let reports: BTreeMap<String, EventReport> = store
            .windows()
            .map(|w| (w.identifier.clone(), w.report(now)))
            .collect();
        for (identifier, report) in &reports {
            if !report.is_active() {
                store.remove(identifier);
                tracing::info!(event_id = %identifier, "removed ended event");
            }
        }
        reports
    }

    /// Timer callback: pop the window, then run its export outside the lock
    ///
    /// A callback whose generation no longer matches the store (cancelled,
    /// re-armed, or already fired) does nothing.
    pub(crate) async fn on_expiry(&self, identifier: &str, generation: u64) {
        let Some(window) = self.take_fired(identifier, generation) else {
            tracing::info!(
                event_id = identifier,
                "event was already cancelled or does not exist"
            );
            return;
        };

        tracing::info!(event_id = identifier, "event window ended, exporting");
        self.shared.runner.run(ExportJob::from(window)).await;
    }

    fn take_fired(&self, identifier: &str, generation: u64) -> Option<EventWindow> {
        self.store().pop_fired(identifier, generation)
    }

    /// Log every live window; returns the number of windows logged
    ///
    /// Never mutates the store.
    pub fn log_active(&self) -> usize {
        let now = self.shared.clock.now();
        let store = self.store();
        if store.is_empty() {
            return 0;
        }

        tracing::info!(count = store.len(), "active events");
        for window in store.windows() {
            if window.is_expired(now) {
                tracing::info!(event_id = %window.identifier, "event has ended");
            } else {
                tracing::info!(
                    event_id = %window.identifier,
                    start = %format_timestamp(&window.start_time),
                    end = %format_timestamp(&window.end_time),
                    remaining_secs = %format!("{:.2}", window.remaining_secs(now)),
                    cameras = ?window.cameras,
                    "active event"
                );
            }
        }
        store.len()
    }

    /// Cancel every timer and forget every window
    ///
    /// Returns the number of discarded windows.
    pub fn shutdown(&self) -> usize {
        let discarded = self.store().clear();
        for window in &discarded {
            tracing::info!(event_id = %window.identifier, "discarding event on shutdown");
        }
        discarded.len()
    }

    /// Number of windows currently tracked, ended or not
    pub fn len(&self) -> usize {
        self.store().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store().is_empty()
    }

    /// Snapshot of the tracked window, if any
    pub fn window(&self, identifier: &str) -> Option<EventWindow> {
        self.store().get(identifier).cloned()
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
