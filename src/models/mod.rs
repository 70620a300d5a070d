// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod ledger;
pub mod progress;
pub mod role;
pub mod workout;

pub use ledger::{LessonCounter, LessonSummary, Payment, PaymentsStats};
pub use progress::{Notification, ProgressLog, ProgressPhoto, ReminderState};
pub use role::{normalize_role, LegacyRole, Role};
pub use workout::{WorkoutLog, WorkoutStatus};
