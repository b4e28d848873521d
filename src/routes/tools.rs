// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calorie calculator routes (public, stateless).

use crate::error::{AppError, Result};
use crate::models::{Intensity, WorkoutSummary};
use crate::services::calculator::{self, ExerciseKind, EXERCISES};
use crate::services::{ExercisePlan, WorkoutPlan};
use crate::AppState;
use axum::{
    extract::rejection::JsonRejection,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Upper bound on a single calculation.
const MAX_CALORIES: f64 = 100_000.0;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tools/exercises", get(list_exercises))
        .route("/tools/exercise-plan", post(exercise_plan))
        .route("/tools/balanced-routine", post(balanced_routine))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseInfo {
    pub name: String,
    /// Calories per minute at low, moderate and high intensity
    pub calories_per_minute: [f64; 3],
    /// Set for rep-counted exercises
    pub reps_per_minute: Option<f64>,
}

async fn list_exercises() -> Json<Vec<ExerciseInfo>> {
    Json(
        EXERCISES
            .iter()
            .map(|e| ExerciseInfo {
                name: e.name.to_string(),
                calories_per_minute: e.rates,
                reps_per_minute: match e.kind {
                    ExerciseKind::Reps { per_minute } => Some(per_minute),
                    ExerciseKind::Duration => None,
                },
            })
            .collect(),
    )
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExercisePlanRequest {
    #[validate(range(max = MAX_CALORIES))]
    pub calories: f64,
    #[serde(default)]
    pub intensity: Intensity,
    #[serde(default)]
    #[validate(length(max = 16))]
    pub exercises: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExercisePlanResponse {
    #[serde(flatten)]
    pub plan: ExercisePlan,
    /// Ready to send as `workoutSummary` once completed
    pub workout_summary: WorkoutSummary,
}

async fn exercise_plan(
    payload: std::result::Result<Json<ExercisePlanRequest>, JsonRejection>,
) -> Result<Json<ExercisePlanResponse>> {
    let Json(req) = payload?;
    req.validate()?;
    finite(req.calories)?;

    let plan = calculator::exercise_plan(req.calories, req.intensity, &req.exercises)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    Ok(Json(ExercisePlanResponse {
        workout_summary: plan.to_summary(),
        plan,
    }))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BalancedRoutineRequest {
    #[validate(range(max = MAX_CALORIES))]
    pub calories: f64,
    #[serde(default)]
    pub intensity: Intensity,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalancedRoutineResponse {
    #[serde(flatten)]
    pub plan: WorkoutPlan,
    pub workout_summary: WorkoutSummary,
}

async fn balanced_routine(
    payload: std::result::Result<Json<BalancedRoutineRequest>, JsonRejection>,
) -> Result<Json<BalancedRoutineResponse>> {
    let Json(req) = payload?;
    req.validate()?;
    finite(req.calories)?;

    let plan = calculator::balanced_routine(req.calories, req.intensity);
    tracing::debug!(
        calories = req.calories,
        minutes = plan.duration_minutes,
        "Built balanced routine"
    );

    Ok(Json(BalancedRoutineResponse {
        workout_summary: plan.to_summary(),
        plan,
    }))
}

fn finite(calories: f64) -> Result<()> {
    if calories.is_finite() {
        Ok(())
    } else {
        Err(AppError::BadRequest("Calories must be a number".to_string()))
    }
}
