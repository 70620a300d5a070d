// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! 22Club API Server
//!
//! Serves the gym's derived-state layer: workout streaks, lesson-credit
//! counters, progress reminders, and cached payment statistics.

use club22_api::{
    config::Config,
    db::FirestoreDb,
    services::{LessonLedger, ReminderEngine, StatsCache},
    AppState, STATS_CACHE_TTL_MINUTES,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting 22Club API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    let lessons = LessonLedger::new(db.clone());
    let reminders = ReminderEngine::new(db.clone());
    let stats_cache = StatsCache::new(chrono::Duration::minutes(STATS_CACHE_TTL_MINUTES));
    tracing::info!(ttl_minutes = STATS_CACHE_TTL_MINUTES, "Stats cache initialized");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        lessons,
        reminders,
        stats_cache,
    });

    // Build router
    let app = club22_api::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("club22_api=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
