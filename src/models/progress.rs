// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Progress tracking models (measurements, photos, reminders).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One body-measurement entry for an athlete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressLog {
    /// Athlete profile ID
    pub athlete_id: String,
    /// Measurement date
    pub date: NaiveDate,
}

/// One progress photo entry for an athlete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressPhoto {
    /// Athlete profile ID
    pub athlete_id: String,
    /// Photo date
    pub date: NaiveDate,
}

/// Notification record created when a reminder threshold is crossed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Recipient profile ID
    pub user_id: String,
    pub title: String,
    pub body: String,
    /// Deep-link path inside the app
    pub link: String,
    /// Type tag ("progress_reminder" or "photo_reminder")
    #[serde(rename = "type")]
    pub notification_type: String,
    /// When the notification was created (ISO 8601)
    pub sent_at: String,
}

/// Derived reminder state for one athlete.
///
/// Computed on demand, never persisted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReminderState {
    pub needs_measurement: bool,
    pub needs_photo: bool,
    pub last_measurement_date: Option<NaiveDate>,
    pub last_photo_date: Option<NaiveDate>,
    pub days_since_measurement: Option<i64>,
    pub days_since_photo: Option<i64>,
}
