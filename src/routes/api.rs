// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::role::Role;
use crate::models::{LessonCounter, LessonSummary, ReminderState};
use crate::services::streak::streak_for_athlete;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/streak", get(get_streak))
        .route("/api/lessons", get(get_lessons))
        .route("/api/lessons/{athlete_id}/purchase", post(record_purchase))
        .route("/api/lessons/{athlete_id}/consume", post(consume_lesson))
        .route("/api/reminders", get(get_reminders))
        .route("/api/stats/payments", get(get_payments_stats))
}

/// Resolve which athlete a request targets.
///
/// Staff roles may target any athlete via the query parameter; everyone
/// else is pinned to their own profile. An unrecognized role counts as
/// non-staff (deny by default).
fn resolve_target(user: &AuthUser, requested: Option<String>) -> Result<String> {
    match requested {
        Some(athlete_id) if athlete_id != user.user_id => {
            if user.role.is_some_and(|role| role.is_staff()) {
                Ok(athlete_id)
            } else {
                Err(AppError::Forbidden(
                    "Only staff may access other athletes".to_string(),
                ))
            }
        }
        _ => Ok(user.user_id.clone()),
    }
}

fn require_staff(user: &AuthUser) -> Result<()> {
    if user.role.is_some_and(|role| role.is_staff()) {
        Ok(())
    } else {
        Err(AppError::Forbidden("Staff role required".to_string()))
    }
}

// ─── Streak ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct StreakQuery {
    athlete_id: Option<String>,
}

/// Streak response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StreakResponse {
    pub athlete_id: String,
    pub streak_days: u32,
}

/// Get the consecutive-workout-day streak for an athlete.
///
/// Advisory: store failures render as streak 0 rather than an error.
async fn get_streak(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<StreakQuery>,
) -> Result<Json<StreakResponse>> {
    let athlete_id = resolve_target(&user, params.athlete_id)?;

    let streak_days = streak_for_athlete(&state.db, &athlete_id).await;

    Ok(Json(StreakResponse {
        athlete_id,
        streak_days,
    }))
}

// ─── Lesson Ledger ───────────────────────────────────────────

/// Lesson summaries response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LessonsResponse {
    pub counters: Vec<LessonSummary>,
}

/// Get lesson-credit summaries.
///
/// Staff see every counter; athletes see only their own.
async fn get_lessons(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<LessonsResponse>> {
    let counters = match user.role {
        Some(role) if role.is_staff() => state.lessons.summaries().await?,
        Some(Role::Atleta) => state
            .lessons
            .summary_for_athlete(&user.user_id)
            .await?
            .into_iter()
            .collect(),
        _ => {
            return Err(AppError::Forbidden(
                "No lesson counters for this role".to_string(),
            ))
        }
    };

    Ok(Json(LessonsResponse { counters }))
}

/// Purchase payload.
#[derive(Deserialize, Validate)]
struct PurchaseRequest {
    #[validate(range(min = 1, max = 500))]
    lessons_purchased: u32,
    #[validate(range(min = 0))]
    amount_cents: i64,
}

/// Counter state after a ledger write.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CounterResponse {
    pub athlete_id: String,
    pub lesson_type: String,
    pub remaining: u32,
    pub updated_at: String,
}

impl From<LessonCounter> for CounterResponse {
    fn from(counter: LessonCounter) -> Self {
        Self {
            athlete_id: counter.athlete_id,
            lesson_type: counter.lesson_type,
            remaining: counter.count,
            updated_at: counter.updated_at,
        }
    }
}

/// Record a lesson purchase and credit the athlete's counter.
///
/// Write-path errors surface to the caller so the UI does not mark the
/// purchase complete on a failed credit.
async fn record_purchase(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(athlete_id): Path<String>,
    Json(payload): Json<PurchaseRequest>,
) -> Result<Json<CounterResponse>> {
    require_staff(&user)?;
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let counter = state
        .lessons
        .record_purchase(&athlete_id, payload.lessons_purchased, payload.amount_cents)
        .await?;

    Ok(Json(counter.into()))
}

/// Consume one lesson from the athlete's counter.
async fn consume_lesson(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(athlete_id): Path<String>,
) -> Result<Json<CounterResponse>> {
    require_staff(&user)?;

    let counter = state.lessons.consume_lesson(&athlete_id).await?;

    Ok(Json(counter.into()))
}

// ─── Reminders ───────────────────────────────────────────────

#[derive(Deserialize)]
struct RemindersQuery {
    athlete_id: Option<String>,
}

/// Get the current reminder state for an athlete.
///
/// Creates the corresponding notification records as a side effect when
/// a threshold is crossed. Advisory and fail-open, like the streak.
async fn get_reminders(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<RemindersQuery>,
) -> Result<Json<ReminderState>> {
    let athlete_id = resolve_target(&user, params.athlete_id)?;

    let reminders = state.reminders.check_reminders(&athlete_id).await;

    Ok(Json(reminders))
}

// ─── Payment Stats ───────────────────────────────────────────

#[derive(Deserialize)]
struct PaymentsStatsQuery {
    year: Option<i32>,
    month: Option<u32>,
}

/// Get aggregate payment stats for one month, memoized for a short TTL.
async fn get_payments_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<PaymentsStatsQuery>,
) -> Result<Json<crate::models::PaymentsStats>> {
    use chrono::Datelike;

    require_staff(&user)?;

    let now = chrono::Utc::now().date_naive();
    let year = params.year.unwrap_or_else(|| now.year());
    let month = params.month.unwrap_or_else(|| now.month());

    if !(1..=12).contains(&month) {
        return Err(AppError::BadRequest(
            "Month must be between 1 and 12".to_string(),
        ));
    }

    let cache_key = format!("payments-stats:{}:{}", year, month);
    if let Some(cached) = state.stats_cache.get(&cache_key) {
        tracing::debug!(key = %cache_key, "Payment stats served from cache");
        return Ok(Json(cached));
    }

    let stats = state.lessons.monthly_stats(year, month).await?;
    state.stats_cache.set(&cache_key, stats.clone());

    Ok(Json(stats))
}
