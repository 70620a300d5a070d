// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Lesson-credit ledger reconciliation.
//!
//! The stored counter (`LessonCounter.count`) is the single source of
//! truth for remaining lessons. Purchase and consumption apply a delta to
//! it inside a Firestore transaction; the display path additionally sums
//! non-reversed payments per athlete to show `total_purchased` and a
//! derived `total_used`.

use crate::db::FirestoreDb;
use crate::error::Result;
use crate::models::ledger::ledger_timestamp;
use crate::models::{LessonCounter, LessonSummary, Payment, PaymentsStats};
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;

/// Lesson-credit ledger over the external store.
#[derive(Clone)]
pub struct LessonLedger {
    db: FirestoreDb,
}

impl LessonLedger {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Remaining lessons for one athlete (0 when no counter exists yet).
    pub async fn remaining_lessons(&self, athlete_id: &str) -> Result<u32> {
        Ok(self
            .db
            .get_lesson_counter(athlete_id)
            .await?
            .map(|counter| counter.count)
            .unwrap_or(0))
    }

    /// Per-athlete lesson totals for every counter in the store.
    pub async fn summaries(&self) -> Result<Vec<LessonSummary>> {
        let counters = self.db.list_lesson_counters().await?;

        let athlete_ids: Vec<String> = counters
            .iter()
            .map(|counter| counter.athlete_id.clone())
            .collect();
        let payments = self.db.get_active_payments(&athlete_ids).await?;

        Ok(summarize(&counters, &payments))
    }

    /// Lesson totals for a single athlete, if a counter exists.
    pub async fn summary_for_athlete(&self, athlete_id: &str) -> Result<Option<LessonSummary>> {
        let Some(counter) = self.db.get_lesson_counter(athlete_id).await? else {
            return Ok(None);
        };

        let payments = self
            .db
            .get_active_payments(std::slice::from_ref(&counter.athlete_id))
            .await?;

        Ok(summarize(&[counter], &payments).into_iter().next())
    }

    /// Record a purchase: persist the payment and add the purchased
    /// quantity to the athlete's counter (creating it when absent).
    ///
    /// Store errors propagate to the caller; a silently dropped write
    /// here would corrupt credit state.
    pub async fn record_purchase(
        &self,
        athlete_id: &str,
        lessons_purchased: u32,
        amount_cents: i64,
    ) -> Result<LessonCounter> {
        let payment = Payment {
            athlete_id: athlete_id.to_string(),
            amount_cents,
            lessons_purchased,
            is_reversal: false,
            created_at: ledger_timestamp(Utc::now()),
        };
        self.db.create_payment(&payment).await?;

        let counter = self
            .db
            .adjust_lesson_counter(athlete_id, i64::from(lessons_purchased))
            .await?;

        tracing::info!(
            athlete_id,
            lessons_purchased,
            remaining = counter.count,
            "Recorded lesson purchase"
        );

        Ok(counter)
    }

    /// Consume one lesson: subtract 1 from the counter, clamped at 0.
    pub async fn consume_lesson(&self, athlete_id: &str) -> Result<LessonCounter> {
        let counter = self.db.adjust_lesson_counter(athlete_id, -1).await?;

        tracing::info!(athlete_id, remaining = counter.count, "Consumed lesson");

        Ok(counter)
    }

    /// Aggregate payment statistics for one calendar month.
    ///
    /// Recomputed from payment records on every call; the route layer
    /// memoizes the result in the stats cache.
    pub async fn monthly_stats(&self, year: i32, month: u32) -> Result<PaymentsStats> {
        let (start, end) = month_bounds(year, month)?;

        let payments = self.db.get_payments_between(&start, &end).await?;

        Ok(aggregate_payments(&payments, year, month))
    }
}

/// RFC3339 `[start, end)` bounds covering one calendar month.
///
/// Built in the exact format `ledger_timestamp` writes, so the store's
/// lexicographic range filter on `created_at` selects the whole month
/// and nothing else.
fn month_bounds(year: i32, month: u32) -> Result<(String, String)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| crate::error::AppError::BadRequest("Invalid year/month".to_string()))?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| crate::error::AppError::BadRequest("Invalid year/month".to_string()))?;

    Ok((
        format!("{}T00:00:00Z", start),
        format!("{}T00:00:00Z", end),
    ))
}

/// Fold a month's payment records into display totals.
fn aggregate_payments(payments: &[Payment], year: i32, month: u32) -> PaymentsStats {
    let mut stats = PaymentsStats {
        year,
        month,
        revenue_cents: 0,
        lessons_sold: 0,
        payment_count: 0,
        generated_at: ledger_timestamp(Utc::now()),
    };

    for payment in payments.iter().filter(|p| !p.is_reversal) {
        stats.revenue_cents += payment.amount_cents;
        stats.lessons_sold += payment.lessons_purchased;
        stats.payment_count += 1;
    }

    stats
}

/// Join counters with payment aggregates into display summaries.
///
/// `remaining` comes from the stored counter; `total_purchased` from the
/// payment sum; `total_used` is derived and clamped at zero.
fn summarize(counters: &[LessonCounter], payments: &[Payment]) -> Vec<LessonSummary> {
    let mut purchased_by_athlete: HashMap<&str, u32> = HashMap::new();
    for payment in payments.iter().filter(|p| !p.is_reversal) {
        *purchased_by_athlete
            .entry(payment.athlete_id.as_str())
            .or_insert(0) += payment.lessons_purchased;
    }

    counters
        .iter()
        .map(|counter| {
            let total_purchased = purchased_by_athlete
                .get(counter.athlete_id.as_str())
                .copied()
                .unwrap_or(0);

            LessonSummary {
                athlete_id: counter.athlete_id.clone(),
                remaining: counter.count,
                total_purchased,
                total_used: total_purchased.saturating_sub(counter.count),
                updated_at: counter.updated_at.clone(),
            }
        })
        .collect()
}
