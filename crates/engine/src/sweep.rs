// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background sweep that periodically logs the active events

use crate::scheduler::EventScheduler;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use upem_core::Clock;

const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Spawn the sweep; abort the returned handle to stop it
///
/// The sweep only logs. Intervals shorter than one second are raised to one
/// second.
pub fn spawn_sweep<C: Clock>(scheduler: EventScheduler<C>, interval: Duration) -> JoinHandle<()> {
    let period = interval.max(MIN_INTERVAL);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            scheduler.log_active();
        }
    })
}

#[cfg(test)]
#[path = "sweep_tests.rs"]
mod tests;
