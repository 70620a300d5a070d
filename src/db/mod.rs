//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const PROFILES: &str = "profiles";
    pub const WORKOUT_LOGS: &str = "workout_logs";
    /// Lesson counters (keyed by athlete_id)
    pub const LESSON_COUNTERS: &str = "lesson_counters";
    pub const PAYMENTS: &str = "payments";
    pub const PROGRESS_LOGS: &str = "progress_logs";
    pub const PROGRESS_PHOTOS: &str = "progress_photos";
    pub const NOTIFICATIONS: &str = "notifications";
}
