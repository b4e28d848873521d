// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile and daily ledger reconciliation.
//!
//! Every counter change is a read-modify-write run atomically by the store
//! (`FitnessStore::modify_*`), so increments from concurrent requests are
//! never lost, even across instances. Daily records live at a deterministic
//! document ID, so concurrent first writes for one (email, date) address the
//! same document instead of creating duplicates.
//!
//! On top of that, requests in this process queue on a per-document async
//! lock so they do not contend inside the store:
//! - `user:{email}` for profile edits and workout logging
//! - `daily:{email}:{date}` for daily record updates

use chrono::NaiveDate;
use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::db::{FitnessStore, Modified, Mutation};
use crate::error::{AppError, Result};
use crate::models::{DailyDelta, DailyRecord, ProfileUpdate, User, UserProfile, WorkoutSummary};
use crate::time_utils::{format_record_date, format_utc_rfc3339};

/// Per-document locks, shared by every clone of the service.
pub type DocumentLocks = Arc<DashMap<String, Arc<Mutex<()>>>>;

/// Outcome of a `daily` ledger update.
#[derive(Debug, Clone, PartialEq)]
pub enum DailyOutcome {
    /// Record existed and was changed.
    Updated(DailyRecord),
    /// Record existed; nothing to change, nothing written.
    Unchanged(DailyRecord),
    /// Record did not exist and was created.
    Created(DailyRecord),
}

/// Result of logging a workout.
#[derive(Debug, Clone)]
pub struct WorkoutLogged {
    pub user: User,
    pub daily_record: DailyRecord,
}

/// Profile plus today's ledger, for the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub profile: Option<UserProfile>,
    pub today: Option<DailyRecord>,
    /// Percentage of today's target burned (0..=100)
    pub progress: u32,
}

/// Handle on one entry of the lock table.
///
/// Dropping it removes the entry once no other task holds or waits on the
/// lock, including when the owning future is cancelled mid-wait.
struct LockEntry {
    locks: DocumentLocks,
    key: String,
    lock: Arc<Mutex<()>>,
}

impl LockEntry {
    fn acquire(locks: &DocumentLocks, key: String) -> Self {
        let lock = locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        Self {
            locks: locks.clone(),
            key,
            lock,
        }
    }
}

impl Drop for LockEntry {
    fn drop(&mut self) {
        // Only the table and this handle left
        self.locks.remove_if(&self.key, |_, lock| {
            Arc::ptr_eq(lock, &self.lock) && Arc::strong_count(lock) == 2
        });
    }
}

#[derive(Clone)]
pub struct LedgerService {
    store: Arc<dyn FitnessStore>,
    locks: DocumentLocks,
}

impl LedgerService {
    pub fn new(store: Arc<dyn FitnessStore>) -> Self {
        Self {
            store,
            locks: Arc::new(DashMap::new()),
        }
    }

    /// Run `op` while holding the in-process lock for `key`.
    async fn locked<T, F>(&self, key: String, op: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let entry = LockEntry::acquire(&self.locks, key);
        let _held = entry.lock.lock().await;
        op.await
    }

    /// Number of live lock entries (for tests and diagnostics).
    pub fn active_locks(&self) -> usize {
        self.locks.len()
    }

    // ─── Dashboard ───────────────────────────────────────────────

    /// Load the profile and `today`'s record.
    pub async fn dashboard(&self, email: &str, today: NaiveDate) -> Result<DashboardView> {
        let date = format_record_date(today);
        let user = self.store.get_user(email).await?;
        let record = self.store.get_daily_record(email, &date).await?;

        let burned = record.as_ref().map_or(0.0, |r| r.calories_burned_today);
        let target = user
            .as_ref()
            .and_then(|u| u.daily_calories_target)
            .or_else(|| record.as_ref().map(|r| r.daily_calories_target_at_record_time))
            .unwrap_or(0.0);

        Ok(DashboardView {
            profile: user.map(UserProfile::from),
            today: record,
            progress: DailyRecord::progress_percent(burned, target),
        })
    }

    // ─── Profile ─────────────────────────────────────────────────

    /// Merge profile fields into the user document, creating it if absent.
    pub async fn update_profile(&self, email: &str, update: &ProfileUpdate) -> Result<User> {
        let now = format_utc_rfc3339(chrono::Utc::now());
        let owner = email.to_string();
        let update = update.clone();

        let mutate: Mutation<User> = Arc::new(move |current: Option<User>| {
            let mut user = current.unwrap_or_else(|| User::new(&owner, &now));
            user.apply_profile(&update, &now);
            Some(user)
        });

        let Modified { previous, written } = self
            .locked(format!("user:{email}"), self.store.modify_user(email, mutate))
            .await?;

        if previous.is_none() {
            tracing::info!(email, "Created profile on first update");
        }
        tracing::debug!(email, "Profile updated");

        written.ok_or_else(|| AppError::Internal(anyhow::anyhow!("profile update wrote nothing")))
    }

    // ─── Workouts ────────────────────────────────────────────────

    /// Log a completed workout.
    ///
    /// Updates the user document (recent workout, history, lifetime total),
    /// then adds the calories to `today`'s record. The record is created on
    /// first write with the target from `target_override`, else the profile's
    /// target, else zero.
    ///
    /// Each document is updated atomically, but the two are separate writes:
    /// if the daily record update fails the user document keeps its update.
    pub async fn log_workout(
        &self,
        email: &str,
        mut summary: WorkoutSummary,
        target_override: Option<f64>,
        today: NaiveDate,
    ) -> Result<WorkoutLogged> {
        if !summary.calories_burned.is_finite() || summary.calories_burned < 0.0 {
            return Err(AppError::BadRequest(
                "Workout summary with numeric calories burned is required".to_string(),
            ));
        }

        let now = format_utc_rfc3339(chrono::Utc::now());
        summary.logged_at = now.clone();
        let calories = summary.calories_burned;

        let record_user: Mutation<User> = {
            let now = now.clone();
            // Do not resurrect users that were never created
            Arc::new(move |current: Option<User>| {
                current.map(|mut user| {
                    user.record_workout(summary.clone(), &now);
                    user
                })
            })
        };

        let user = self
            .locked(
                format!("user:{email}"),
                self.store.modify_user(email, record_user),
            )
            .await?
            .written
            .ok_or_else(|| AppError::NotFound(format!("User {email} not found")))?;

        let target = target_override
            .or(user.daily_calories_target)
            .unwrap_or(0.0);
        let delta = DailyDelta {
            burned: Some(calories),
            ..Default::default()
        };
        let date = format_record_date(today);

        let add_burned: Mutation<DailyRecord> = {
            let (owner, day) = (email.to_string(), date.clone());
            Arc::new(move |current: Option<DailyRecord>| {
                Some(match current {
                    Some(mut record) => {
                        record.apply(&delta, &now);
                        record
                    }
                    None => DailyRecord::seeded(
                        &owner,
                        &day,
                        &DailyDelta {
                            target: Some(target),
                            ..delta
                        },
                        &now,
                    ),
                })
            })
        };

        let daily_record = self
            .locked(
                format!("daily:{email}:{date}"),
                self.store.modify_daily_record(email, &date, add_burned),
            )
            .await
            .and_then(|modified| {
                modified.written.ok_or_else(|| {
                    AppError::Internal(anyhow::anyhow!("daily record update wrote nothing"))
                })
            })
            .inspect_err(|e| {
                tracing::error!(
                    email,
                    date = %date,
                    error = %e,
                    "Workout recorded on profile but daily record update failed"
                );
            })?;

        tracing::info!(
            email,
            calories,
            burned_today = daily_record.calories_burned_today,
            lifetime = user.total_lifetime_calories_burned,
            "Workout logged"
        );

        Ok(WorkoutLogged { user, daily_record })
    }

    // ─── Daily Records ───────────────────────────────────────────

    /// Apply a daily entry for `date`.
    ///
    /// An existing record has its burned counter incremented and its target
    /// overwritten; an empty delta writes nothing. A missing record is created
    /// seeded with the delta, absent values defaulting to zero.
    pub async fn log_daily(
        &self,
        email: &str,
        date: NaiveDate,
        delta: DailyDelta,
    ) -> Result<DailyOutcome> {
        let date = format_record_date(date);
        let now = format_utc_rfc3339(chrono::Utc::now());

        let mutate: Mutation<DailyRecord> = {
            let (owner, day) = (email.to_string(), date.clone());
            Arc::new(move |current: Option<DailyRecord>| match current {
                Some(mut record) => record.apply(&delta, &now).then_some(record),
                None => Some(DailyRecord::seeded(&owner, &day, &delta, &now)),
            })
        };

        let modified = self
            .locked(
                format!("daily:{email}:{date}"),
                self.store.modify_daily_record(email, &date, mutate),
            )
            .await?;

        match (modified.previous, modified.written) {
            (None, Some(record)) => {
                tracing::debug!(email, date = %date, "Daily record created");
                Ok(DailyOutcome::Created(record))
            }
            (Some(_), Some(record)) => {
                tracing::debug!(email, date = %date, "Daily record updated");
                Ok(DailyOutcome::Updated(record))
            }
            (Some(record), None) => {
                tracing::debug!(email, date = %date, "Empty daily update, nothing written");
                Ok(DailyOutcome::Unchanged(record))
            }
            (None, None) => Err(AppError::Internal(anyhow::anyhow!(
                "daily record for {date} neither found nor created"
            ))),
        }
    }
}
