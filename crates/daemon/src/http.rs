// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP API: start/extend, cancel and status of events

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use upem_core::{Clock, EventReport};
use upem_engine::EventScheduler;

/// Body of `POST /start`
#[derive(Debug, Default, Deserialize)]
pub struct StartRequest {
    pub identifier: Option<String>,
    pub past_minutes: Option<i64>,
    pub future_minutes: Option<i64>,
    pub cameras: Option<Vec<String>>,
}

/// Body of `POST /cancel`
#[derive(Debug, Default, Deserialize)]
pub struct CancelRequest {
    pub identifier: Option<String>,
}

/// Query of `GET /status`
#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    pub identifier: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub events: BTreeMap<String, EventReport>,
}

#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub events: BTreeMap<String, EventReport>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub active_events: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Client errors; nothing is mutated when one is returned
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing event identifier")]
    MissingIdentifier,
    #[error("{0}")]
    InvalidBody(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// Build the API router over a shared scheduler
pub fn router<C: Clock>(scheduler: EventScheduler<C>) -> Router {
    Router::new()
        .route("/start", post(start::<C>))
        .route("/cancel", post(cancel::<C>))
        .route("/status", get(status::<C>))
        .route("/health", get(health::<C>))
        .with_state(scheduler)
}

fn require_identifier(identifier: Option<String>) -> Result<String, ApiError> {
    identifier
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::MissingIdentifier)
}

async fn start<C: Clock>(
    State(scheduler): State<EventScheduler<C>>,
    body: Result<Json<StartRequest>, JsonRejection>,
) -> Result<Json<StartResponse>, ApiError> {
    let Json(request) = body.inspect_err(|e| tracing::error!("Error starting event: {}", e))?;
    let identifier = require_identifier(request.identifier)
        .inspect_err(|e| tracing::error!("Error starting event: {}", e))?;

    let outcome = scheduler.extend(
        &identifier,
        request.past_minutes,
        request.future_minutes,
        request.cameras.unwrap_or_default(),
    );

    // A window that already ended still has its timer armed; querying status
    // here would remove it before the export runs.
    Ok(Json(StartResponse {
        events: BTreeMap::from([(identifier, outcome.report)]),
        message: outcome.message,
    }))
}

async fn cancel<C: Clock>(
    State(scheduler): State<EventScheduler<C>>,
    body: Result<Json<CancelRequest>, JsonRejection>,
) -> Result<Json<CancelResponse>, ApiError> {
    let Json(request) = body.inspect_err(|e| tracing::error!("Error cancelling event: {}", e))?;
    let identifier = require_identifier(request.identifier)
        .inspect_err(|e| tracing::error!("Error cancelling event: {}", e))?;

    scheduler.cancel(&identifier);
    Ok(Json(CancelResponse {
        status: "cancelled",
    }))
}

async fn status<C: Clock>(
    State(scheduler): State<EventScheduler<C>>,
    Query(query): Query<StatusQuery>,
) -> Json<EventsResponse> {
    let events = match query.identifier.filter(|id| !id.is_empty()) {
        Some(identifier) => {
            let report = scheduler.status(&identifier);
            BTreeMap::from([(identifier, report)])
        }
        None => scheduler.status_all(),
    };
    Json(EventsResponse { events })
}

async fn health<C: Clock>(State(scheduler): State<EventScheduler<C>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        active_events: scheduler.len(),
    })
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
