// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod cache;
pub mod lessons;
pub mod reminders;
pub mod streak;

pub use cache::{Clock, StatsCache, SystemClock};
pub use lessons::LessonLedger;
pub use reminders::ReminderEngine;
pub use streak::calculate_streak_days;
