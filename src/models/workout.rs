// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout log model for streak computation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Completion status of a logged workout.
///
/// Stored rows use the Italian "completato"/"saltato" values; older rows
/// wrote the English forms, kept as serde aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkoutStatus {
    #[serde(rename = "completato", alias = "completed")]
    Completed,
    #[serde(rename = "saltato", alias = "skipped", other)]
    Skipped,
}

/// One logged workout for an athlete.
///
/// Read-only to this layer; the activity-logging UI owns creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutLog {
    /// Athlete profile ID (owner)
    pub athlete_id: String,
    /// Calendar date of the workout (time-of-day is irrelevant for streaks)
    pub date: NaiveDate,
    /// Completion status; absent means the log predates the status column
    pub status: Option<WorkoutStatus>,
}

impl WorkoutLog {
    /// A log counts toward the streak when explicitly completed or when
    /// the status is unspecified (old rows never set it).
    pub fn counts_as_completed(&self) -> bool {
        matches!(self.status, Some(WorkoutStatus::Completed) | None)
    }
}
