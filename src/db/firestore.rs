// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Workout logs (streak input)
//! - Lesson counters and payments (credit ledger)
//! - Progress logs/photos (reminder input)
//! - Notifications (reminder output)
//!
//! Every row crosses the boundary as a typed serde struct; nothing
//! downstream touches raw documents.

use crate::db::collections;
use crate::error::AppError;
use crate::models::ledger::ledger_timestamp;
use crate::models::{LessonCounter, Notification, Payment, ProgressLog, ProgressPhoto, WorkoutLog};
use futures_util::{stream, StreamExt};
use serde::Deserialize;

const MAX_CONCURRENT_DB_OPS: usize = 10;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

/// Minimal profile row used to enumerate athletes for the reminder sweep.
#[derive(Deserialize)]
struct ProfileRow {
    #[serde(rename = "_firestore_id")]
    id: String,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Workout Log Operations ──────────────────────────────────

    /// Get recent workout logs for an athlete, newest first.
    pub async fn get_workout_logs(
        &self,
        athlete_id: &str,
        limit: u32,
    ) -> Result<Vec<WorkoutLog>, AppError> {
        let athlete_id = athlete_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::WORKOUT_LOGS)
            .filter(move |q| q.field("athlete_id").eq(athlete_id.clone()))
            .order_by([("date", firestore::FirestoreQueryDirection::Descending)])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Lesson Counter Operations ───────────────────────────────

    /// Get the lesson counter for an athlete.
    pub async fn get_lesson_counter(
        &self,
        athlete_id: &str,
    ) -> Result<Option<LessonCounter>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::LESSON_COUNTERS)
            .obj()
            .one(athlete_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all lesson counters.
    pub async fn list_lesson_counters(&self) -> Result<Vec<LessonCounter>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::LESSON_COUNTERS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Apply a delta to an athlete's remaining-lesson count, clamped at 0.
    ///
    /// Runs via `run_transaction`: the read goes through the
    /// transaction-scoped db handle it hands the closure, so the commit
    /// validates the read set and a concurrent purchase and consumption
    /// for the same athlete abort and retry with backoff instead of
    /// losing an update. Creates the counter when absent (first
    /// purchase, or a consumption recorded before any purchase).
    pub async fn adjust_lesson_counter(
        &self,
        athlete_id: &str,
        delta: i64,
    ) -> Result<LessonCounter, AppError> {
        let athlete_id = athlete_id.to_string();
        self.get_client()?
            .run_transaction(|db, transaction| {
                let athlete_id = athlete_id.clone();
                Box::pin(async move {
                    let current: Option<LessonCounter> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::LESSON_COUNTERS)
                        .obj()
                        .one(&athlete_id)
                        .await?;

                    let counter = LessonCounter::apply_delta(
                        current,
                        &athlete_id,
                        delta,
                        ledger_timestamp(chrono::Utc::now()),
                    );

                    db.fluent()
                        .update()
                        .in_col(collections::LESSON_COUNTERS)
                        .document_id(&athlete_id)
                        .object(&counter)
                        .add_to_transaction(transaction)?;

                    Ok(counter)
                })
            })
            .await
            .map_err(|e| AppError::Database(format!("Counter adjustment failed: {}", e)))
    }

    // ─── Payment Operations ──────────────────────────────────────

    /// Store a payment record with a generated document ID.
    pub async fn create_payment(&self, payment: &Payment) -> Result<(), AppError> {
        let _: Payment = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::PAYMENTS)
            .generate_document_id()
            .object(payment)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get non-reversed payments for a set of athletes.
    ///
    /// One query per athlete, run concurrently with a limit; Firestore's
    /// `in` filter caps out at 10 values, which gyms exceed.
    pub async fn get_active_payments(
        &self,
        athlete_ids: &[String],
    ) -> Result<Vec<Payment>, AppError> {
        let client = self.get_client()?;

        let per_athlete: Vec<Result<Vec<Payment>, AppError>> =
            stream::iter(athlete_ids.to_vec())
                .map(|athlete_id| async move {
                    client
                        .fluent()
                        .select()
                        .from(collections::PAYMENTS)
                        .filter(move |q| {
                            q.for_all([
                                q.field("athlete_id").eq(athlete_id.clone()),
                                q.field("is_reversal").eq(false),
                            ])
                        })
                        .obj()
                        .query()
                        .await
                        .map_err(|e| AppError::Database(e.to_string()))
                })
                .buffer_unordered(MAX_CONCURRENT_DB_OPS)
                .collect()
                .await;

        let mut payments = Vec::new();
        for result in per_athlete {
            payments.extend(result?);
        }
        Ok(payments)
    }

    /// Get all payments created in `[start, end)` (RFC3339 bounds).
    pub async fn get_payments_between(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<Payment>, AppError> {
        let start = start.to_string();
        let end = end.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::PAYMENTS)
            .filter(move |q| {
                q.for_all([
                    q.field("created_at").greater_than_or_equal(start.clone()),
                    q.field("created_at").less_than(end.clone()),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Progress Operations ─────────────────────────────────────

    /// Get the single most recent measurement for an athlete.
    pub async fn get_latest_progress_log(
        &self,
        athlete_id: &str,
    ) -> Result<Option<ProgressLog>, AppError> {
        let athlete_id = athlete_id.to_string();
        let logs: Vec<ProgressLog> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::PROGRESS_LOGS)
            .filter(move |q| q.field("athlete_id").eq(athlete_id.clone()))
            .order_by([("date", firestore::FirestoreQueryDirection::Descending)])
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(logs.into_iter().next())
    }

    /// Get the single most recent progress photo for an athlete.
    pub async fn get_latest_progress_photo(
        &self,
        athlete_id: &str,
    ) -> Result<Option<ProgressPhoto>, AppError> {
        let athlete_id = athlete_id.to_string();
        let photos: Vec<ProgressPhoto> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::PROGRESS_PHOTOS)
            .filter(move |q| q.field("athlete_id").eq(athlete_id.clone()))
            .order_by([("date", firestore::FirestoreQueryDirection::Descending)])
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(photos.into_iter().next())
    }

    // ─── Notification Operations ─────────────────────────────────

    /// Store a notification record with a generated document ID.
    pub async fn create_notification(&self, notification: &Notification) -> Result<(), AppError> {
        let _: Notification = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::NOTIFICATIONS)
            .generate_document_id()
            .object(notification)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Profile Operations ──────────────────────────────────────

    /// List profile IDs for every athlete (canonical and legacy role
    /// spellings both count).
    pub async fn list_athlete_ids(&self) -> Result<Vec<String>, AppError> {
        let profiles: Vec<ProfileRow> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::PROFILES)
            .filter(|q| {
                q.for_any([
                    q.field("role").eq("atleta"),
                    q.field("role").eq("athlete"),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(profiles.into_iter().map(|p| p.id).collect())
    }
}
