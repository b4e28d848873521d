// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout summary model, stored on the user document.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::lenient;

/// Workout intensity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    #[default]
    Moderate,
    High,
}

/// Unit an exercise amount is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum AmountUnit {
    Reps,
    Minutes,
    Seconds,
}

/// One exercise line produced by the calculators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExerciseResult {
    pub name: String,
    pub amount: u32,
    pub unit: AmountUnit,
    /// Calories attributed to this exercise
    #[serde(default)]
    pub calories_burned: f64,
}

/// Exercise line of a logged workout.
///
/// Lines in the calculators' shape are typed. Anything else a client sends
/// (stretches timed in `duration`, extra display fields) is stored as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(untagged)]
pub enum ExerciseEntry {
    Planned(ExerciseResult),
    Other(serde_json::Value),
}

impl ExerciseEntry {
    /// Calories attributed to this line, zero if it carries none.
    pub fn calories_burned(&self) -> f64 {
        match self {
            ExerciseEntry::Planned(result) => result.calories_burned,
            ExerciseEntry::Other(value) => value
                .get("caloriesBurned")
                .and_then(serde_json::Value::as_f64)
                .unwrap_or(0.0),
        }
    }
}

impl From<ExerciseResult> for ExerciseEntry {
    fn from(result: ExerciseResult) -> Self {
        ExerciseEntry::Planned(result)
    }
}

/// Completed workout, as logged against a user.
///
/// Immutable once logged: it is stored as `recentWorkout`, appended to
/// `workoutHistory`, and folded into the day's burned-calories counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSummary {
    pub calories_burned: f64,
    #[serde(
        default,
        deserialize_with = "lenient::or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_minutes: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub intensity: Option<Intensity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exercises: Vec<ExerciseEntry>,
    /// When the workout was logged (RFC3339, set by the server)
    #[serde(default)]
    pub logged_at: String,
}
