// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! 22Club derived-state backend
//!
//! This crate provides the backend API for the gym's derived bookkeeping:
//! workout streaks, lesson-credit counters, progress reminders, and
//! cached payment statistics, computed over the managed data store.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::FirestoreDb;
use models::PaymentsStats;
use services::{LessonLedger, ReminderEngine, StatsCache};

/// How long computed payment stats stay fresh.
pub const STATS_CACHE_TTL_MINUTES: i64 = 2;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub lessons: LessonLedger,
    pub reminders: ReminderEngine,
    pub stats_cache: StatsCache<PaymentsStats>,
}
