// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout streak calculation.
//!
//! A streak is the number of consecutive calendar days, counted backward
//! from today, with at least one completed workout. The chain must reach
//! today or yesterday to count as current; a single missed day further
//! back breaks it.

use crate::db::FirestoreDb;
use crate::models::WorkoutLog;
use chrono::{NaiveDate, Utc};
use std::collections::BTreeSet;

/// Count consecutive workout days ending at `today` or the day before.
///
/// Logs with an unspecified status count as completed (old rows never set
/// the status column). Multiple logs on the same day count once. Future
/// dates are not special-cased; they participate in the gap arithmetic
/// like any other date.
pub fn calculate_streak_days(logs: &[WorkoutLog], today: NaiveDate) -> u32 {
    // Unique completed dates, most recent first
    let unique_dates: BTreeSet<NaiveDate> = logs
        .iter()
        .filter(|log| log.counts_as_completed())
        .map(|log| log.date)
        .collect();

    let mut dates = unique_dates.into_iter().rev();

    let Some(most_recent) = dates.next() else {
        return 0;
    };

    // The chain is only current if it reaches today or yesterday.
    let days_since_last = (today - most_recent).num_days();
    if days_since_last > 1 {
        return 0;
    }

    let mut streak = 1;
    let mut expected = most_recent;

    for date in dates {
        if expected - date == chrono::Duration::days(1) {
            streak += 1;
            expected = date;
        } else {
            break;
        }
    }

    streak
}

/// How far back to scan workout logs for the streak (one year).
const STREAK_LOG_LIMIT: u32 = 365;

/// Compute the streak for an athlete from their stored workout logs.
///
/// The streak is an advisory enrichment: store errors are logged with the
/// athlete ID and swallowed into a streak of 0 rather than failing the
/// caller's page.
pub async fn streak_for_athlete(db: &FirestoreDb, athlete_id: &str) -> u32 {
    let logs = match db.get_workout_logs(athlete_id, STREAK_LOG_LIMIT).await {
        Ok(logs) => logs,
        Err(err) => {
            tracing::warn!(athlete_id, error = %err, "Failed to load workout logs for streak");
            return 0;
        }
    };

    calculate_streak_days(&logs, Utc::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkoutStatus;

    fn log(date: NaiveDate, status: Option<WorkoutStatus>) -> WorkoutLog {
        WorkoutLog {
            athlete_id: "athlete-1".to_string(),
            date,
            status,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_logs_is_zero() {
        assert_eq!(calculate_streak_days(&[], day(2026, 3, 10)), 0);
    }

    #[test]
    fn test_single_workout_today() {
        let today = day(2026, 3, 10);
        let logs = vec![log(today, Some(WorkoutStatus::Completed))];
        assert_eq!(calculate_streak_days(&logs, today), 1);
    }

    #[test]
    fn test_single_workout_yesterday_is_still_current() {
        let today = day(2026, 3, 10);
        let logs = vec![log(day(2026, 3, 9), None)];
        assert_eq!(calculate_streak_days(&logs, today), 1);
    }

    #[test]
    fn test_consecutive_run_with_unspecified_status() {
        let today = day(2026, 3, 10);
        // Status omitted on all three: treated as completed
        let logs = vec![
            log(day(2026, 3, 10), None),
            log(day(2026, 3, 9), None),
            log(day(2026, 3, 8), None),
        ];
        assert_eq!(calculate_streak_days(&logs, today), 3);
    }

    #[test]
    fn test_gap_breaks_chain() {
        let today = day(2026, 3, 10);
        let logs = vec![
            log(day(2026, 3, 10), Some(WorkoutStatus::Completed)),
            log(day(2026, 3, 7), Some(WorkoutStatus::Completed)),
        ];
        assert_eq!(calculate_streak_days(&logs, today), 1);
    }

    #[test]
    fn test_stale_run_is_zero() {
        let today = day(2026, 3, 10);
        let logs = vec![
            log(day(2026, 3, 8), Some(WorkoutStatus::Completed)),
            log(day(2026, 3, 7), Some(WorkoutStatus::Completed)),
        ];
        assert_eq!(calculate_streak_days(&logs, today), 0);
    }

    #[test]
    fn test_skipped_workouts_do_not_count() {
        let today = day(2026, 3, 10);
        let logs = vec![
            log(day(2026, 3, 10), Some(WorkoutStatus::Skipped)),
            log(day(2026, 3, 9), Some(WorkoutStatus::Completed)),
        ];
        assert_eq!(calculate_streak_days(&logs, today), 1);
    }

    #[test]
    fn test_duplicate_dates_count_once() {
        let today = day(2026, 3, 10);
        let logs = vec![
            log(day(2026, 3, 10), Some(WorkoutStatus::Completed)),
            log(day(2026, 3, 10), None),
            log(day(2026, 3, 9), Some(WorkoutStatus::Completed)),
        ];
        assert_eq!(calculate_streak_days(&logs, today), 2);
    }
}
