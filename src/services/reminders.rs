// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Progress reminder engine.
//!
//! Derives "needs attention" flags per athlete from the most recent
//! measurement and photo dates, and creates notification records when a
//! threshold is crossed. Reminders are advisory: every store failure on
//! this path is logged and swallowed, never surfaced to the caller.
//!
//! Periodic firing is driven by an external scheduler hitting the
//! `/tasks/progress-reminders` route; there is no in-process timer.
//! Repeated sweeps before the underlying activity changes will re-create
//! the same reminders (known gap, no per-day dedup in this layer).

use crate::db::FirestoreDb;
use crate::models::{Notification, ReminderState};
use chrono::{NaiveDate, Utc};

/// Days since the last measurement before a reminder fires (inclusive).
pub const MEASUREMENT_REMINDER_DAYS: i64 = 7;
/// Days since the last photo before a reminder fires (inclusive).
pub const PHOTO_REMINDER_DAYS: i64 = 14;

/// Evaluate reminder thresholds against the given day.
///
/// An athlete with no measurement or photo on record gets no reminder
/// from that signal; there is nothing to be overdue from.
pub fn evaluate_reminders(
    last_measurement: Option<NaiveDate>,
    last_photo: Option<NaiveDate>,
    today: NaiveDate,
) -> ReminderState {
    let days_since_measurement = last_measurement.map(|date| (today - date).num_days());
    let days_since_photo = last_photo.map(|date| (today - date).num_days());

    ReminderState {
        needs_measurement: days_since_measurement
            .is_some_and(|days| days >= MEASUREMENT_REMINDER_DAYS),
        needs_photo: days_since_photo.is_some_and(|days| days >= PHOTO_REMINDER_DAYS),
        last_measurement_date: last_measurement,
        last_photo_date: last_photo,
        days_since_measurement,
        days_since_photo,
    }
}

/// Derives reminder state and creates the corresponding notifications.
#[derive(Clone)]
pub struct ReminderEngine {
    db: FirestoreDb,
}

impl ReminderEngine {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Check both reminder thresholds for an athlete and create the
    /// notification records for whichever fired (both may in one call).
    pub async fn check_reminders(&self, athlete_id: &str) -> ReminderState {
        let last_measurement = match self.db.get_latest_progress_log(athlete_id).await {
            Ok(log) => log.map(|l| l.date),
            Err(err) => {
                tracing::warn!(athlete_id, error = %err, "Failed to fetch latest measurement");
                None
            }
        };

        let last_photo = match self.db.get_latest_progress_photo(athlete_id).await {
            Ok(photo) => photo.map(|p| p.date),
            Err(err) => {
                tracing::warn!(athlete_id, error = %err, "Failed to fetch latest photo");
                None
            }
        };

        let state = evaluate_reminders(last_measurement, last_photo, Utc::now().date_naive());

        if state.needs_measurement || state.needs_photo {
            self.send_reminder_notifications(athlete_id, &state).await;
        }

        state
    }

    /// Run the reminder check for every athlete profile.
    ///
    /// Called by the externally scheduled sweep; returns the number of
    /// athletes checked. A failing athlete-list read aborts the sweep
    /// with a logged error rather than a partial pass.
    pub async fn sweep(&self) -> usize {
        let athlete_ids = match self.db.list_athlete_ids().await {
            Ok(ids) => ids,
            Err(err) => {
                tracing::error!(error = %err, "Reminder sweep: failed to list athletes");
                return 0;
            }
        };

        let count = athlete_ids.len();
        for athlete_id in athlete_ids {
            self.check_reminders(&athlete_id).await;
        }

        tracing::info!(athletes = count, "Reminder sweep complete");
        count
    }

    async fn send_reminder_notifications(&self, athlete_id: &str, state: &ReminderState) {
        let now = Utc::now().to_rfc3339();
        let mut notifications = Vec::new();

        if state.needs_measurement {
            notifications.push(Notification {
                user_id: athlete_id.to_string(),
                title: "È ora di aggiornare i tuoi progressi 💪".to_string(),
                body: "Sono passati 7 giorni dall'ultima misurazione. Registra peso, circonferenze e forza!".to_string(),
                link: "/home/progressi".to_string(),
                notification_type: "progress_reminder".to_string(),
                sent_at: now.clone(),
            });
        }

        if state.needs_photo {
            notifications.push(Notification {
                user_id: athlete_id.to_string(),
                title: "Carica nuove foto per vedere il tuo cambiamento 📸".to_string(),
                body: "Sono passati 14 giorni dall'ultima foto. Scatta nuove foto per monitorare i progressi!".to_string(),
                link: "/home/progressi/foto".to_string(),
                notification_type: "photo_reminder".to_string(),
                sent_at: now.clone(),
            });
        }

        for notification in notifications {
            if let Err(err) = self.db.create_notification(&notification).await {
                tracing::error!(
                    athlete_id,
                    notification_type = %notification.notification_type,
                    error = %err,
                    "Failed to create reminder notification"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_measurement_below_threshold() {
        let today = day(2026, 3, 10);
        let state = evaluate_reminders(Some(day(2026, 3, 4)), None, today);

        assert!(!state.needs_measurement);
        assert_eq!(state.days_since_measurement, Some(6));
    }

    #[test]
    fn test_measurement_at_threshold_fires() {
        let today = day(2026, 3, 10);
        let state = evaluate_reminders(Some(day(2026, 3, 3)), None, today);

        assert!(state.needs_measurement);
        assert_eq!(state.days_since_measurement, Some(7));
    }

    #[test]
    fn test_photo_below_threshold() {
        let today = day(2026, 3, 20);
        let state = evaluate_reminders(None, Some(day(2026, 3, 7)), today);

        assert!(!state.needs_photo);
        assert_eq!(state.days_since_photo, Some(13));
    }

    #[test]
    fn test_photo_at_threshold_fires() {
        let today = day(2026, 3, 20);
        let state = evaluate_reminders(None, Some(day(2026, 3, 6)), today);

        assert!(state.needs_photo);
        assert_eq!(state.days_since_photo, Some(14));
    }

    #[test]
    fn test_both_thresholds_can_fire_together() {
        let today = day(2026, 3, 20);
        let state = evaluate_reminders(Some(day(2026, 3, 1)), Some(day(2026, 3, 1)), today);

        assert!(state.needs_measurement);
        assert!(state.needs_photo);
    }

    #[test]
    fn test_no_history_means_no_reminder() {
        let state = evaluate_reminders(None, None, day(2026, 3, 10));

        assert!(!state.needs_measurement);
        assert!(!state.needs_photo);
        assert_eq!(state.last_measurement_date, None);
        assert_eq!(state.days_since_measurement, None);
    }
}
