// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Task handler routes for the externally scheduled reminder sweep.
//!
//! Called by Cloud Scheduler via Cloud Tasks on a fixed interval, never
//! directly by users. Running the sweep out-of-process means a single
//! firing per interval even when the API scales horizontally.

use crate::config::REMINDER_QUEUE_NAME;
use crate::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

/// Task handler routes (called by Cloud Tasks).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/tasks/progress-reminders", post(run_reminder_sweep))
}

#[derive(Serialize)]
struct SweepResponse {
    athletes_checked: usize,
}

/// Run the progress-reminder check for every athlete.
async fn run_reminder_sweep(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<SweepResponse>, StatusCode> {
    // Cloud Run strips this header from external requests, so its
    // presence guarantees internal origin; the value pins the queue.
    let queue_name = headers
        .get("x-cloudtasks-queuename")
        .and_then(|h| h.to_str().ok());

    if queue_name != Some(REMINDER_QUEUE_NAME) {
        tracing::warn!(
            header = ?queue_name,
            "Blocked reminder sweep with invalid queue header"
        );
        return Err(StatusCode::FORBIDDEN);
    }

    let athletes_checked = state.reminders.sweep().await;

    Ok(Json(SweepResponse { athletes_checked }))
}
