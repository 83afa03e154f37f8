// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

fn counting_callback(counter: &Arc<AtomicU32>) -> impl Future<Output = ()> + Send + 'static {
    let counter = Arc::clone(counter);
    async move {
        counter.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test(start_paused = true)]
async fn timer_fires_after_delay() {
    let fired = Arc::new(AtomicU32::new(0));
    let handle = arm(Duration::from_secs(10), counting_callback(&fired));

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    // Cancelling after the callback ran is a no-op
    handle.cancel();
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn cancelled_timer_never_fires() {
    let fired = Arc::new(AtomicU32::new(0));
    let handle = arm(Duration::from_secs(10), counting_callback(&fired));

    handle.cancel();
    tokio::time::sleep(Duration::from_secs(20)).await;

    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn dropping_handle_keeps_timer_armed() {
    let fired = Arc::new(AtomicU32::new(0));
    drop(arm(Duration::from_secs(1), counting_callback(&fired)));

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn zero_delay_fires_promptly() {
    let fired = Arc::new(AtomicU32::new(0));
    let _handle = arm(Duration::ZERO, counting_callback(&fired));

    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}
