// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::scheduler::JobRunner;
use async_trait::async_trait;
use chrono::DateTime;
use std::sync::Arc;
use upem_core::{EventDefaults, ExportJob, FakeClock};

struct NoopRunner;

#[async_trait]
impl JobRunner for NoopRunner {
    async fn run(&self, _job: ExportJob) {}
}

fn scheduler() -> (EventScheduler<FakeClock>, FakeClock) {
    let clock = FakeClock::at(DateTime::parse_from_rfc3339("2024-01-01T10:00:00+00:00").unwrap());
    let scheduler = EventScheduler::new(clock.clone(), EventDefaults::default(), Arc::new(NoopRunner));
    (scheduler, clock)
}

#[tokio::test(start_paused = true)]
async fn sweep_leaves_ended_events_in_place() {
    let (scheduler, clock) = scheduler();
    scheduler.extend("a", None, Some(1), vec![]);
    // Wall clock is past the end; the runtime timer has not fired yet
    clock.advance(Duration::from_secs(600));

    let sweep = spawn_sweep(scheduler.clone(), Duration::from_secs(10));
    tokio::time::sleep(Duration::from_secs(35)).await;

    assert_eq!(scheduler.len(), 1);
    sweep.abort();
}

#[tokio::test(start_paused = true)]
async fn aborted_sweep_stops() {
    let (scheduler, _clock) = scheduler();

    let sweep = spawn_sweep(scheduler, Duration::from_secs(10));
    tokio::time::sleep(Duration::from_secs(15)).await;
    sweep.abort();

    let err = sweep.await.unwrap_err();
    assert!(err.is_cancelled());
}

#[tokio::test(start_paused = true)]
async fn zero_interval_is_raised() {
    let (scheduler, _clock) = scheduler();

    let sweep = spawn_sweep(scheduler, Duration::ZERO);
    tokio::time::sleep(Duration::from_secs(3)).await;

    assert!(!sweep.is_finished(), "sweep must keep running");
    sweep.abort();
}
