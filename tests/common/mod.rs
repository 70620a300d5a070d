// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use club22_api::config::Config;
use club22_api::db::FirestoreDb;
use club22_api::middleware::auth::create_jwt;
use club22_api::routes::create_router;
use club22_api::services::{LessonLedger, ReminderEngine, StatsCache};
use club22_api::{AppState, STATS_CACHE_TTL_MINUTES};
use std::sync::Arc;

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();

    let state = Arc::new(AppState {
        config,
        lessons: LessonLedger::new(db.clone()),
        reminders: ReminderEngine::new(db.clone()),
        stats_cache: StatsCache::new(chrono::Duration::minutes(STATS_CACHE_TTL_MINUTES)),
        db,
    });

    (create_router(state.clone()), state)
}

/// Create a signed JWT for tests.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, role: Option<&str>, signing_key: &[u8]) -> String {
    create_jwt(user_id, role, signing_key).expect("Failed to sign test JWT")
}
