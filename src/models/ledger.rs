// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Lesson-credit ledger and payment models.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Default lesson type when a purchase creates a fresh counter.
pub const DEFAULT_LESSON_TYPE: &str = "standard";

/// Timestamp format for ledger rows (`created_at`, `updated_at`).
///
/// Whole seconds with a `Z` suffix. Month queries compare these values
/// lexicographically against range bounds built the same way, so every
/// writer must go through this function; `to_rfc3339()` output
/// (`+00:00` offset, fractional seconds) would sort against the bounds
/// incorrectly.
pub fn ledger_timestamp(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Remaining-lesson counter for one athlete.
///
/// `count` is the authoritative remaining value: incremented on purchase,
/// decremented on consumption, never recomputed from history on the write
/// paths. It must never go negative; zero is a valid terminal-ish state
/// and does not trigger deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonCounter {
    /// Athlete profile ID (also used as document ID)
    pub athlete_id: String,
    /// Lesson type ("standard" unless the gym sells specialty packages)
    pub lesson_type: String,
    /// Remaining lessons
    pub count: u32,
    /// Last update timestamp (ISO 8601)
    pub updated_at: String,
}

impl LessonCounter {
    /// Apply a signed delta to the stored count, clamped at zero.
    ///
    /// When no counter exists yet the count starts from zero with the
    /// default lesson type; an existing counter keeps its type. The
    /// store layer calls this inside its transaction so the arithmetic
    /// has exactly one definition.
    pub fn apply_delta(
        current: Option<LessonCounter>,
        athlete_id: &str,
        delta: i64,
        updated_at: String,
    ) -> LessonCounter {
        let count = current.as_ref().map(|c| i64::from(c.count)).unwrap_or(0);

        LessonCounter {
            athlete_id: athlete_id.to_string(),
            lesson_type: current
                .map(|c| c.lesson_type)
                .unwrap_or_else(|| DEFAULT_LESSON_TYPE.to_string()),
            count: (count + delta).max(0) as u32,
            updated_at,
        }
    }
}

/// One payment transaction.
///
/// Immutable once created; a reversal is a separate cancelling record,
/// never a mutation of the original.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Athlete profile ID
    pub athlete_id: String,
    /// Amount paid, in euro cents
    pub amount_cents: i64,
    /// Number of lessons this payment bought
    pub lessons_purchased: u32,
    /// Whether this record cancels a prior purchase
    #[serde(default)]
    pub is_reversal: bool,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
}

/// Per-athlete lesson totals, derived on read for display.
///
/// `remaining` is the stored counter value; `total_purchased` is summed
/// fresh from non-reversed payments; `total_used` is the difference,
/// clamped at zero. The derived `total_used` can disagree with actual
/// consumption history if a counter was ever adjusted out-of-band.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LessonSummary {
    pub athlete_id: String,
    pub remaining: u32,
    pub total_purchased: u32,
    pub total_used: u32,
    pub updated_at: String,
}

/// Aggregate payment statistics for one calendar month.
///
/// Served from the stats cache; reversed purchases are excluded from the
/// totals.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PaymentsStats {
    pub year: i32,
    pub month: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub revenue_cents: i64,
    pub lessons_sold: u32,
    pub payment_count: u32,
    /// When the aggregate was computed (ISO 8601)
    pub generated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> String {
        "2026-03-10T09:00:00Z".to_string()
    }

    #[test]
    fn test_first_purchase_creates_counter_from_zero() {
        // Fresh athlete: no counter means 0 remaining, a 10-lesson
        // purchase leaves 10.
        let counter = LessonCounter::apply_delta(None, "a1", 10, ts());

        assert_eq!(counter.count, 10);
        assert_eq!(counter.athlete_id, "a1");
        assert_eq!(counter.lesson_type, DEFAULT_LESSON_TYPE);
    }

    #[test]
    fn test_purchase_then_consumption_sequence() {
        let after_purchase = LessonCounter::apply_delta(None, "a1", 5, ts());
        let after_one = LessonCounter::apply_delta(Some(after_purchase), "a1", -1, ts());
        let after_two = LessonCounter::apply_delta(Some(after_one), "a1", -1, ts());
        let after_three = LessonCounter::apply_delta(Some(after_two), "a1", -1, ts());

        assert_eq!(after_three.count, 2);
    }

    #[test]
    fn test_consumption_clamps_at_zero() {
        let empty = LessonCounter {
            athlete_id: "a1".to_string(),
            lesson_type: DEFAULT_LESSON_TYPE.to_string(),
            count: 0,
            updated_at: ts(),
        };

        let counter = LessonCounter::apply_delta(Some(empty), "a1", -1, ts());

        assert_eq!(counter.count, 0);
    }

    #[test]
    fn test_consumption_before_any_purchase_creates_zero_counter() {
        let counter = LessonCounter::apply_delta(None, "a1", -1, ts());

        assert_eq!(counter.count, 0);
        assert_eq!(counter.lesson_type, DEFAULT_LESSON_TYPE);
    }

    #[test]
    fn test_existing_lesson_type_is_preserved() {
        let existing = LessonCounter {
            athlete_id: "a1".to_string(),
            lesson_type: "pilates".to_string(),
            count: 3,
            updated_at: ts(),
        };

        let counter = LessonCounter::apply_delta(Some(existing), "a1", 2, ts());

        assert_eq!(counter.lesson_type, "pilates");
        assert_eq!(counter.count, 5);
    }

    #[test]
    fn test_ledger_timestamp_is_whole_seconds_with_z_suffix() {
        let date = chrono::Utc
            .with_ymd_and_hms(2026, 3, 1, 0, 0, 0)
            .unwrap()
            + chrono::Duration::milliseconds(500);

        assert_eq!(ledger_timestamp(date), "2026-03-01T00:00:00Z");
    }
}
