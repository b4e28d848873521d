// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory document store.
//!
//! Suitable for local development and tests. Data lives only as long as the
//! process.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::db::{daily_doc_id, user_doc_id, FitnessStore, Modified, Mutation};
use crate::error::AppError;
use crate::models::{DailyRecord, User};

/// `DashMap`-backed store keyed by the same document IDs Firestore uses.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<String, User>,
    daily_records: DashMap<String, DailyRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored daily records across all users.
    pub fn daily_record_count(&self) -> usize {
        self.daily_records.len()
    }
}

/// Run `mutate` while holding the shard lock for the entry.
fn modify_entry<T: Clone>(entry: Entry<'_, String, T>, mutate: &Mutation<T>) -> Modified<T> {
    match entry {
        Entry::Occupied(mut slot) => {
            let previous = slot.get().clone();
            let written = mutate(Some(previous.clone()));
            if let Some(doc) = &written {
                slot.insert(doc.clone());
            }
            Modified {
                previous: Some(previous),
                written,
            }
        }
        Entry::Vacant(slot) => {
            let written = mutate(None);
            if let Some(doc) = &written {
                slot.insert(doc.clone());
            }
            Modified {
                previous: None,
                written,
            }
        }
    }
}

#[async_trait]
impl FitnessStore for MemoryStore {
    async fn get_user(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .get(&user_doc_id(email))
            .map(|entry| entry.value().clone()))
    }

    async fn create_user(&self, user: &User) -> Result<bool, AppError> {
        match self.users.entry(user_doc_id(&user.email)) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                Ok(true)
            }
        }
    }

    async fn put_user(&self, user: &User) -> Result<(), AppError> {
        self.users.insert(user_doc_id(&user.email), user.clone());
        Ok(())
    }

    async fn get_daily_record(
        &self,
        email: &str,
        date: &str,
    ) -> Result<Option<DailyRecord>, AppError> {
        Ok(self
            .daily_records
            .get(&daily_doc_id(email, date))
            .map(|entry| entry.value().clone()))
    }

    async fn put_daily_record(&self, record: &DailyRecord) -> Result<(), AppError> {
        self.daily_records
            .insert(daily_doc_id(&record.email, &record.date), record.clone());
        Ok(())
    }

    async fn modify_user(
        &self,
        email: &str,
        mutate: Mutation<User>,
    ) -> Result<Modified<User>, AppError> {
        Ok(modify_entry(self.users.entry(user_doc_id(email)), &mutate))
    }

    async fn modify_daily_record(
        &self,
        email: &str,
        date: &str,
        mutate: Mutation<DailyRecord>,
    ) -> Result<Modified<DailyRecord>, AppError> {
        Ok(modify_entry(
            self.daily_records.entry(daily_doc_id(email, date)),
            &mutate,
        ))
    }
}
