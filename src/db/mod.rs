// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! Handlers and services talk to a [`FitnessStore`]; the concrete backend
//! (Firestore or in-memory) is chosen once at startup.

pub mod firestore;
pub mod memory;

use async_trait::async_trait;
use std::sync::Arc;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

use crate::error::AppError;
use crate::models::{DailyRecord, User};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Daily calorie ledger (keyed by email and date)
    pub const DAILY_RECORDS: &str = "daily_records";
}

/// Document ID for a user.
pub fn user_doc_id(email: &str) -> String {
    urlencoding::encode(email).into_owned()
}

/// Document ID for a daily record. One document per (email, date).
pub fn daily_doc_id(email: &str, date: &str) -> String {
    format!("{}_{}", urlencoding::encode(email), date)
}

/// Pure document mutation for [`FitnessStore`] read-modify-write calls.
///
/// Receives the current document (if any) and returns the document to write,
/// or `None` to leave storage untouched. May run more than once when a
/// transaction is retried.
pub type Mutation<T> = Arc<dyn Fn(Option<T>) -> Option<T> + Send + Sync>;

/// Result of a read-modify-write.
#[derive(Debug, Clone, PartialEq)]
pub struct Modified<T> {
    /// Document as read before the mutation
    pub previous: Option<T>,
    /// Document written, if the mutation produced one
    pub written: Option<T>,
}

/// Document store for profiles and the daily ledger.
///
/// `modify_*` operations are atomic per document: concurrent callers, in this
/// process or another, never overwrite each other's changes.
#[async_trait]
pub trait FitnessStore: Send + Sync {
    /// Get a user by normalized email.
    async fn get_user(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Insert a user only if no document exists for the email.
    ///
    /// Returns `false` without writing when the user already exists.
    async fn create_user(&self, user: &User) -> Result<bool, AppError>;

    /// Create or replace a user document.
    async fn put_user(&self, user: &User) -> Result<(), AppError>;

    /// Get the daily record for (email, date).
    async fn get_daily_record(
        &self,
        email: &str,
        date: &str,
    ) -> Result<Option<DailyRecord>, AppError>;

    /// Create or replace a daily record.
    async fn put_daily_record(&self, record: &DailyRecord) -> Result<(), AppError>;

    /// Atomically read, mutate and write a user document.
    async fn modify_user(
        &self,
        email: &str,
        mutate: Mutation<User>,
    ) -> Result<Modified<User>, AppError>;

    /// Atomically read, mutate and write the daily record for (email, date).
    async fn modify_daily_record(
        &self,
        email: &str,
        date: &str,
        mutate: Mutation<DailyRecord>,
    ) -> Result<Modified<DailyRecord>, AppError>;
}
