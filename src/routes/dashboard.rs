// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard routes: profile read/write, workout logging and daily entries.
//!
//! The auth middleware is applied in routes/mod.rs; every handler also checks
//! that the session owns the requested email.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{normalize_email, DailyDelta, DailyRecord, ProfileUpdate, UserProfile, WorkoutSummary};
use crate::routes::MessageResponse;
use crate::services::DailyOutcome;
use crate::time_utils::{parse_record_date, today_utc};
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const EMAIL_REQUIRED: &str = "Email is required";

/// Dashboard routes (require authentication via JWT).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/dashboard", get(get_dashboard).post(post_dashboard))
}

/// Validate presence of the request email and that the session owns it.
fn owned_email(user: &AuthUser, email: Option<&str>) -> Result<String> {
    let email = email
        .map(normalize_email)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::BadRequest(EMAIL_REQUIRED.to_string()))?;
    user.ensure_owns(&email)?;
    Ok(email)
}

// ─── Read ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub email: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub profile: Option<UserProfile>,
    pub today_daily_record: Option<DailyRecord>,
    /// Percent of today's target burned, capped at 100
    pub progress: u32,
}

async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    query: std::result::Result<Query<DashboardQuery>, QueryRejection>,
) -> Result<Json<DashboardResponse>> {
    let Query(query) = query?;
    let email = owned_email(&user, query.email.as_deref())?;

    let view = state.ledger.dashboard(&email, today_utc()).await?;

    Ok(Json(DashboardResponse {
        profile: view.profile,
        today_daily_record: view.today,
        progress: view.progress,
    }))
}

// ─── Write ───────────────────────────────────────────────────

/// `POST /dashboard` body; `type` selects the operation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardUpdate {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub email: Option<String>,
    pub profile_data: Option<ProfileUpdate>,
    /// Checked for a numeric `caloriesBurned` before it is parsed
    pub workout_summary: Option<Value>,
    pub daily_calories_target: Option<f64>,
    pub daily_record: Option<DailyEntry>,
}

/// Daily entry. Non-numeric amounts are ignored, as are other fields
/// (`caloriesConsumed` included).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyEntry {
    pub date: Option<String>,
    /// New daily calorie target
    pub daily_calories: Option<Value>,
    pub calories_burned: Option<Value>,
}

fn numeric(value: &Option<Value>) -> Option<f64> {
    value.as_ref().and_then(Value::as_f64)
}

async fn post_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: std::result::Result<Json<DashboardUpdate>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let Json(mut update) = payload?;
    let email = owned_email(&user, update.email.as_deref())?;
    let kind = std::mem::take(&mut update.kind);

    let message = match kind.as_str() {
        "profile" => update_profile(&state, &email, update.profile_data).await?,
        "logWorkout" => log_workout(&state, &email, update).await?,
        "daily" => log_daily(&state, &email, update.daily_record).await?,
        other => {
            tracing::debug!(kind = other, "Rejected unknown dashboard update type");
            return Err(AppError::BadRequest("Invalid type".to_string()));
        }
    };

    Ok(Json(MessageResponse::new(message)))
}

async fn update_profile(
    state: &AppState,
    email: &str,
    profile: Option<ProfileUpdate>,
) -> Result<&'static str> {
    let profile =
        profile.ok_or_else(|| AppError::BadRequest("Profile data is required".to_string()))?;
    profile.validate()?;

    state.ledger.update_profile(email, &profile).await?;
    Ok("Profile updated successfully")
}

async fn log_workout(state: &AppState, email: &str, update: DashboardUpdate) -> Result<&'static str> {
    let summary = update
        .workout_summary
        .filter(|s| s.get("caloriesBurned").is_some_and(Value::is_number))
        .ok_or_else(|| {
            AppError::BadRequest(
                "Workout summary with numeric calories burned is required".to_string(),
            )
        })?;
    let summary: WorkoutSummary = serde_json::from_value(summary)
        .map_err(|e| AppError::BadRequest(format!("Invalid workout summary: {e}")))?;

    let target = update.daily_calories_target.or(update
        .profile_data
        .as_ref()
        .and_then(|p| p.daily_calories_target));

    state
        .ledger
        .log_workout(email, summary, target, today_utc())
        .await?;
    Ok("Workout logged successfully")
}

async fn log_daily(state: &AppState, email: &str, entry: Option<DailyEntry>) -> Result<&'static str> {
    let Some((entry, raw_date)) = entry.and_then(|e| {
        let date = e.date.clone().filter(|d| !d.trim().is_empty())?;
        Some((e, date))
    }) else {
        return Err(AppError::BadRequest(
            "Daily record with date is required".to_string(),
        ));
    };
    let date = parse_record_date(&raw_date).ok_or_else(|| {
        AppError::BadRequest(format!("Invalid date {raw_date}, expected YYYY-MM-DD"))
    })?;

    let delta = DailyDelta {
        target: numeric(&entry.daily_calories),
        burned: numeric(&entry.calories_burned),
    };

    let message = match state.ledger.log_daily(email, date, delta).await? {
        DailyOutcome::Created(_) => "Daily record added successfully",
        DailyOutcome::Updated(_) | DailyOutcome::Unchanged(_) => "Daily record updated successfully",
    };
    Ok(message)
}
