// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use chrono::DateTime;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use upem_core::{EventDefaults, ExportJob, FakeClock};
use upem_engine::JobRunner;

struct NoopRunner;

#[async_trait]
impl JobRunner for NoopRunner {
    async fn run(&self, _job: ExportJob) {}
}

/// Runner that only counts the jobs it is handed
#[derive(Default)]
struct CountingRunner {
    runs: AtomicU32,
}

#[async_trait]
impl JobRunner for CountingRunner {
    async fn run(&self, _job: ExportJob) {
        self.runs.fetch_add(1, Ordering::SeqCst);
    }
}

fn setup() -> (EventScheduler<FakeClock>, FakeClock) {
    let clock = FakeClock::at(DateTime::parse_from_rfc3339("2024-01-01T10:00:00+00:00").unwrap());
    let scheduler = EventScheduler::new(clock.clone(), EventDefaults::default(), Arc::new(NoopRunner));
    (scheduler, clock)
}

async fn send(scheduler: &EventScheduler<FakeClock>, request: Request<Body>) -> (StatusCode, Value) {
    let response = router(scheduler.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_uri(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

// =============================================================================
// POST /start
// =============================================================================

#[tokio::test]
async fn start_new_event() {
    let (scheduler, _clock) = setup();

    let (status, body) = send(
        &scheduler,
        post_json("/start", json!({"identifier": "porch", "cameras": ["Front"]})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "events": {
                "porch": {
                    "start_time": "2024-01-01 09:55:00+0000",
                    "end_time": "2024-01-01 10:05:00+0000",
                    "remaining_time_seconds": 300.0,
                    "cameras": ["Front"],
                }
            },
            "message": "New event porch started",
        })
    );
}

#[tokio::test]
async fn start_known_event_extends() {
    let (scheduler, clock) = setup();
    send(&scheduler, post_json("/start", json!({"identifier": "porch"}))).await;
    clock.advance(std::time::Duration::from_secs(60));

    let (status, body) = send(
        &scheduler,
        post_json("/start", json!({"identifier": "porch", "future_minutes": 1, "cameras": null})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Event porch extended");
    assert_eq!(body["events"]["porch"]["start_time"], "2024-01-01 09:55:00+0000");
    assert_eq!(body["events"]["porch"]["end_time"], "2024-01-01 10:02:00+0000");
    assert_eq!(body["events"]["porch"]["cameras"], json!([]));
}

#[tokio::test]
async fn start_with_explicit_minutes() {
    let (scheduler, _clock) = setup();

    let (_, body) = send(
        &scheduler,
        post_json(
            "/start",
            json!({"identifier": "porch", "past_minutes": 1, "future_minutes": 2}),
        ),
    )
    .await;

    assert_eq!(body["events"]["porch"]["start_time"], "2024-01-01 09:59:00+0000");
    assert_eq!(body["events"]["porch"]["remaining_time_seconds"], 120.0);
}

async fn start_that_already_ended(future_minutes: i64) {
    let clock = FakeClock::at(DateTime::parse_from_rfc3339("2024-01-01T10:00:00+00:00").unwrap());
    let runner = Arc::new(CountingRunner::default());
    let scheduler = EventScheduler::new(clock, EventDefaults::default(), runner.clone());

    let (status, body) = send(
        &scheduler,
        post_json(
            "/start",
            json!({"identifier": "porch", "future_minutes": future_minutes}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "events": {"porch": {"status": "no_event"}},
            "message": "New event porch started",
        })
    );

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(runner.runs.load(Ordering::SeqCst), 1);
    assert!(scheduler.is_empty());
}

#[tokio::test(start_paused = true)]
async fn start_with_zero_future_minutes_still_exports() {
    start_that_already_ended(0).await;
}

#[tokio::test(start_paused = true)]
async fn start_with_negative_future_minutes_still_exports() {
    start_that_already_ended(-1).await;
}

#[tokio::test]
async fn start_without_identifier_is_rejected() {
    let (scheduler, _clock) = setup();

    for body in [json!({}), json!({"identifier": ""}), json!({"identifier": null})] {
        let (status, body) = send(&scheduler, post_json("/start", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Missing event identifier"}));
    }
    assert!(scheduler.is_empty());
}

#[tokio::test]
async fn start_with_malformed_body_is_rejected() {
    let (scheduler, _clock) = setup();
    let request = Request::post("/start")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&scheduler, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert!(scheduler.is_empty());
}

// =============================================================================
// POST /cancel
// =============================================================================

#[tokio::test]
async fn cancel_removes_event() {
    let (scheduler, _clock) = setup();
    scheduler.extend("porch", None, None, vec![]);

    let (status, body) = send(&scheduler, post_json("/cancel", json!({"identifier": "porch"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "cancelled"}));
    assert!(scheduler.is_empty());
}

#[tokio::test]
async fn cancel_unknown_event_still_reports_cancelled() {
    let (scheduler, _clock) = setup();

    let (status, body) = send(&scheduler, post_json("/cancel", json!({"identifier": "nope"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "cancelled"}));
}

#[tokio::test]
async fn cancel_without_identifier_is_rejected() {
    let (scheduler, _clock) = setup();
    scheduler.extend("porch", None, None, vec![]);

    let (status, body) = send(&scheduler, post_json("/cancel", json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing event identifier"}));
    assert_eq!(scheduler.len(), 1);
}

// =============================================================================
// GET /status and /health
// =============================================================================

#[tokio::test]
async fn status_of_unknown_event() {
    let (scheduler, _clock) = setup();

    let (status, body) = send(&scheduler, get_uri("/status?identifier=ghost")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"events": {"ghost": {"status": "no_event"}}}));
}

#[tokio::test]
async fn status_of_all_events_heals_ended_ones() {
    let (scheduler, clock) = setup();
    scheduler.extend("short", None, Some(1), vec![]);
    scheduler.extend("long", None, Some(10), vec!["Back".to_string()]);
    clock.advance(std::time::Duration::from_secs(120));

    let (status, body) = send(&scheduler, get_uri("/status")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["events"]["short"], json!({"status": "no_event"}));
    assert_eq!(body["events"]["long"]["cameras"], json!(["Back"]));
    assert_eq!(body["events"]["long"]["remaining_time_seconds"], 480.0);
    assert_eq!(scheduler.len(), 1);
}

#[tokio::test]
async fn empty_identifier_query_lists_all() {
    let (scheduler, _clock) = setup();
    scheduler.extend("porch", None, None, vec![]);

    let (_, body) = send(&scheduler, get_uri("/status?identifier=")).await;

    assert!(body["events"]["porch"].is_object());
    assert!(body["events"].get("").is_none());
}

#[tokio::test]
async fn health_reports_active_events() {
    let (scheduler, _clock) = setup();
    scheduler.extend("porch", None, None, vec![]);

    let (status, body) = send(&scheduler, get_uri("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "active_events": 1}));
}
