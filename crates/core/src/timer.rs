// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot timers on the tokio runtime

use std::future::Future;
use std::time::Duration;
use tokio::task::AbortHandle;

/// Handle to an armed timer
///
/// Dropping the handle does not cancel the timer. Cancelling a timer whose
/// callback is already running has no effect on that callback, so callers
/// must not rely on `cancel` for at-most-once delivery.
#[derive(Debug)]
pub struct TimerHandle {
    abort: AbortHandle,
}

impl TimerHandle {
    /// Cancel the timer if it has not fired yet
    pub fn cancel(&self) {
        self.abort.abort();
    }
}

/// Arm a timer that runs `callback` after `delay`
///
/// Must be called from within a tokio runtime.
pub fn arm<F>(delay: Duration, callback: F) -> TimerHandle
where
    F: Future<Output = ()> + Send + 'static,
{
    let task = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        callback.await;
    });
    TimerHandle {
        abort: task.abort_handle(),
    }
}

#[cfg(test)]
#[path = "timer_tests.rs"]
mod tests;
