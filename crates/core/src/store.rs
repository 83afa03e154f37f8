// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory event store
//!
//! Maps each identifier to its window and the single timer armed for it.
//! The store is plain data; callers serialize access with one lock.

use crate::event::EventWindow;
use crate::timer::TimerHandle;
use std::collections::HashMap;

#[derive(Debug)]
struct Entry {
    window: EventWindow,
    timer: TimerHandle,
    generation: u64,
}

/// Identifier -> (window, timer) mapping
#[derive(Debug, Default)]
pub struct EventStore {
    entries: HashMap<String, Entry>,
    next_generation: u64,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the generation for the next timer armed through this store
    ///
    /// A timer callback carries its generation so a stale callback (one whose
    /// timer was replaced after it was dispatched) can be told apart from the
    /// current one.
    pub fn next_generation(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    pub fn get(&self, identifier: &str) -> Option<&EventWindow> {
        self.entries.get(identifier).map(|e| &e.window)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn windows(&self) -> impl Iterator<Item = &EventWindow> {
        self.entries.values().map(|e| &e.window)
    }

    /// Insert or replace the entry for the window's identifier
    ///
    /// Any previously armed timer is cancelled before the new handle is
    /// stored, so at most one live timer exists per identifier.
    pub fn insert(&mut self, window: EventWindow, timer: TimerHandle, generation: u64) {
        let identifier = window.identifier.clone();
        let entry = Entry {
            window,
            timer,
            generation,
        };
        if let Some(previous) = self.entries.insert(identifier, entry) {
            previous.timer.cancel();
        }
    }

    /// Remove an entry, cancelling its timer
    pub fn remove(&mut self, identifier: &str) -> Option<EventWindow> {
        self.entries.remove(identifier).map(|entry| {
            entry.timer.cancel();
            entry.window
        })
    }

    /// Pop the entry on behalf of the timer that is firing for it
    ///
    /// Returns `None` when the identifier is gone or now belongs to a newer
    /// timer. The firing timer is not cancelled; it is the caller.
    pub fn pop_fired(&mut self, identifier: &str, generation: u64) -> Option<EventWindow> {
        match self.entries.get(identifier) {
            Some(entry) if entry.generation == generation => {
                self.entries.remove(identifier).map(|e| e.window)
            }
            _ => None,
        }
    }

    /// Cancel every timer and empty the store
    pub fn clear(&mut self) -> Vec<EventWindow> {
        self.entries
            .drain()
            .map(|(_, entry)| {
                entry.timer.cancel();
                entry.window
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
