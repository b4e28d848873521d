// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides document-level operations for:
//! - Users (profile, credentials, workout history)
//! - Daily records (per-date calorie ledger)

use async_trait::async_trait;
use firestore::errors::{BackoffError, FirestoreError};
use serde::{de::DeserializeOwned, Serialize};

use crate::db::{collections, daily_doc_id, user_doc_id, FitnessStore, Modified, Mutation};
use crate::error::AppError;
use crate::models::{DailyRecord, User};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
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

    /// Create an offline client for testing.
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    /// Read-modify-write one document inside a Firestore transaction.
    ///
    /// The read is made through the transaction, so a concurrent commit to the
    /// same document aborts ours and `run_transaction` retries `mutate` against
    /// the fresh value.
    async fn modify_doc<T>(
        &self,
        collection: &'static str,
        doc_id: String,
        mutate: Mutation<T>,
    ) -> Result<Modified<T>, AppError>
    where
        T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
    {
        self.get_client()?
            .run_transaction(move |db, transaction| {
                let doc_id = doc_id.clone();
                let mutate = mutate.clone();

                Box::pin(async move {
                    // 1. Read current document inside the transaction
                    let previous: Option<T> = db
                        .fluent()
                        .select()
                        .by_id_in(collection)
                        .obj()
                        .one(&doc_id)
                        .await?;

                    // 2. Apply the mutation and queue the write
                    let written = mutate(previous.clone());
                    if let Some(doc) = &written {
                        db.fluent()
                            .update()
                            .in_col(collection)
                            .document_id(&doc_id)
                            .object(doc)
                            .add_to_transaction(transaction)?;
                    }

                    Ok::<_, BackoffError<FirestoreError>>(Modified { previous, written })
                })
            })
            .await
            .map_err(|e| AppError::Database(format!("Transaction failed: {}", e)))
    }
}

#[async_trait]
impl FitnessStore for FirestoreDb {
    // ─── User Operations ─────────────────────────────────────────

    async fn get_user(&self, email: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(&user_doc_id(email))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn create_user(&self, user: &User) -> Result<bool, AppError> {
        let result: Result<(), firestore::errors::FirestoreError> = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::USERS)
            .document_id(user_doc_id(&user.email))
            .object(user)
            .execute()
            .await;

        match result {
            Ok(()) => Ok(true),
            // Firestore reports ALREADY_EXISTS for create-only writes as a data conflict
            Err(firestore::errors::FirestoreError::DataConflictError(_)) => {
                tracing::debug!(email = %user.email, "User already exists");
                Ok(false)
            }
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    async fn put_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(user_doc_id(&user.email))
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Daily Record Operations ─────────────────────────────────

    async fn get_daily_record(
        &self,
        email: &str,
        date: &str,
    ) -> Result<Option<DailyRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::DAILY_RECORDS)
            .obj()
            .one(&daily_doc_id(email, date))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn put_daily_record(&self, record: &DailyRecord) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::DAILY_RECORDS)
            .document_id(daily_doc_id(&record.email, &record.date))
            .object(record)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Atomic Updates ──────────────────────────────────────────

    async fn modify_user(
        &self,
        email: &str,
        mutate: Mutation<User>,
    ) -> Result<Modified<User>, AppError> {
        self.modify_doc(collections::USERS, user_doc_id(email), mutate)
            .await
    }

    async fn modify_daily_record(
        &self,
        email: &str,
        date: &str,
        mutate: Mutation<DailyRecord>,
    ) -> Result<Modified<DailyRecord>, AppError> {
        self.modify_doc(collections::DAILY_RECORDS, daily_doc_id(email, date), mutate)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_offline_client_rejects_modify() {
        let db = FirestoreDb::new_mock();
        let err = db
            .modify_user("a@example.com", Arc::new(|current: Option<User>| current))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
