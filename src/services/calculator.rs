// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calorie calculators.
//!
//! Converts a calorie target into exercise amounts using a fixed
//! calories-per-minute table, either for a user-selected set of exercises
//! or as a balanced cardio/strength/flexibility routine.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{AmountUnit, ExerciseEntry, ExerciseResult, Intensity, WorkoutSummary};

/// Share of a balanced routine's calories spent on cardio.
const CARDIO_SHARE: f64 = 0.5;
/// Share spent on strength.
const STRENGTH_SHARE: f64 = 0.3;
/// Share spent on flexibility.
const FLEXIBILITY_SHARE: f64 = 0.2;

/// How an exercise amount is counted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExerciseKind {
    /// Counted in repetitions at a steady pace
    Reps { per_minute: f64 },
    /// Counted in minutes
    Duration,
}

/// Burn rates for one exercise.
#[derive(Debug, Clone, Copy)]
pub struct Exercise {
    pub name: &'static str,
    /// Calories per minute at low, moderate and high intensity
    pub rates: [f64; 3],
    pub kind: ExerciseKind,
}

impl Exercise {
    pub fn calories_per_minute(&self, intensity: Intensity) -> f64 {
        match intensity {
            Intensity::Low => self.rates[0],
            Intensity::Moderate => self.rates[1],
            Intensity::High => self.rates[2],
        }
    }

    /// Amount needed to burn `calories`, plus the minutes that takes.
    fn amount_for(&self, calories: f64, intensity: Intensity) -> (ExerciseResult, f64) {
        let minutes = calories / self.calories_per_minute(intensity);
        let (amount, unit) = match self.kind {
            ExerciseKind::Reps { per_minute } => ((minutes * per_minute).ceil(), AmountUnit::Reps),
            ExerciseKind::Duration => (minutes.ceil(), AmountUnit::Minutes),
        };

        (
            ExerciseResult {
                name: self.name.to_string(),
                amount: amount as u32,
                unit,
                calories_burned: calories,
            },
            minutes,
        )
    }
}

pub static EXERCISES: [Exercise; 8] = [
    Exercise {
        name: "Push-ups",
        rates: [4.0, 7.0, 10.0],
        kind: ExerciseKind::Reps { per_minute: 20.0 },
    },
    Exercise {
        name: "Squats",
        rates: [5.0, 8.0, 12.0],
        kind: ExerciseKind::Reps { per_minute: 15.0 },
    },
    Exercise {
        name: "Sit-ups",
        rates: [3.0, 6.0, 9.0],
        kind: ExerciseKind::Reps { per_minute: 20.0 },
    },
    Exercise {
        name: "Jumping Jacks",
        rates: [8.0, 12.0, 16.0],
        kind: ExerciseKind::Duration,
    },
    Exercise {
        name: "Running",
        rates: [10.0, 15.0, 20.0],
        kind: ExerciseKind::Duration,
    },
    Exercise {
        name: "Cycling",
        rates: [7.0, 11.0, 15.0],
        kind: ExerciseKind::Duration,
    },
    Exercise {
        name: "Swimming",
        rates: [9.0, 13.0, 17.0],
        kind: ExerciseKind::Duration,
    },
    Exercise {
        name: "Jump Rope",
        rates: [11.0, 15.0, 20.0],
        kind: ExerciseKind::Duration,
    },
];

/// Fixed stretches closing a balanced routine: (name, amount, unit).
const STRETCHES: [(&str, u32, AmountUnit); 4] = [
    ("Hamstring Stretch", 30, AmountUnit::Seconds),
    ("Shoulder Stretch", 30, AmountUnit::Seconds),
    ("Hip Flexor Stretch", 30, AmountUnit::Seconds),
    ("Cat-Cow Stretch", 10, AmountUnit::Reps),
];

/// Minutes credited per stretch (a 30 second hold; Cat-Cow counted the same).
const STRETCH_MINUTES: f64 = 0.5;

/// Look up an exercise by name, ignoring case and surrounding whitespace.
pub fn find_exercise(name: &str) -> Option<&'static Exercise> {
    let name = name.trim();
    EXERCISES.iter().find(|e| e.name.eq_ignore_ascii_case(name))
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CalculatorError {
    #[error("Unknown exercise: {0}")]
    UnknownExercise(String),
}

/// Exercises for a selection, calories split evenly.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct ExercisePlan {
    pub total_calories: f64,
    pub intensity: Intensity,
    pub duration_minutes: f64,
    pub exercises: Vec<ExerciseResult>,
}

/// One block of a balanced routine.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PlanSection {
    pub name: String,
    pub exercises: Vec<ExerciseResult>,
}

/// Cardio, strength and flexibility blocks for one calorie target.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlan {
    pub total_calories: f64,
    pub intensity: Intensity,
    pub duration_minutes: f64,
    pub sections: Vec<PlanSection>,
}

/// Split `calories` evenly over the named exercises.
///
/// Duplicate names count once. A non-positive target or an empty selection
/// yields an empty plan.
pub fn exercise_plan(
    calories: f64,
    intensity: Intensity,
    names: &[String],
) -> Result<ExercisePlan, CalculatorError> {
    let mut selected: Vec<&'static Exercise> = Vec::with_capacity(names.len());
    for name in names {
        let exercise =
            find_exercise(name).ok_or_else(|| CalculatorError::UnknownExercise(name.clone()))?;
        if !selected.iter().any(|e| e.name == exercise.name) {
            selected.push(exercise);
        }
    }

    if calories <= 0.0 || selected.is_empty() {
        return Ok(ExercisePlan {
            total_calories: calories.max(0.0),
            intensity,
            duration_minutes: 0.0,
            exercises: Vec::new(),
        });
    }

    let share = calories / selected.len() as f64;
    let mut duration_minutes = 0.0;
    let exercises = selected
        .iter()
        .map(|exercise| {
            let (result, minutes) = exercise.amount_for(share, intensity);
            duration_minutes += minutes;
            result
        })
        .collect();

    Ok(ExercisePlan {
        total_calories: calories,
        intensity,
        duration_minutes,
        exercises,
    })
}

/// Build a balanced routine: half the calories as cardio, 30% strength,
/// 20% flexibility.
pub fn balanced_routine(calories: f64, intensity: Intensity) -> WorkoutPlan {
    let calories = calories.max(0.0);
    if calories == 0.0 {
        return WorkoutPlan {
            total_calories: 0.0,
            intensity,
            duration_minutes: 0.0,
            sections: Vec::new(),
        };
    }

    let mut duration_minutes = 0.0;
    let mut block = |kind_filter: fn(&ExerciseKind) -> bool, budget: f64| {
        let members: Vec<&Exercise> = EXERCISES.iter().filter(|e| kind_filter(&e.kind)).collect();
        let share = budget / members.len() as f64;
        members
            .into_iter()
            .map(|exercise| {
                let (result, minutes) = exercise.amount_for(share, intensity);
                duration_minutes += minutes;
                result
            })
            .collect::<Vec<_>>()
    };

    let cardio = block(
        |k| matches!(k, ExerciseKind::Duration),
        calories * CARDIO_SHARE,
    );
    let strength = block(
        |k| matches!(k, ExerciseKind::Reps { .. }),
        calories * STRENGTH_SHARE,
    );

    let stretch_calories = calories * FLEXIBILITY_SHARE / STRETCHES.len() as f64;
    let flexibility = STRETCHES
        .iter()
        .map(|&(name, amount, unit)| ExerciseResult {
            name: name.to_string(),
            amount,
            unit,
            calories_burned: stretch_calories,
        })
        .collect();
    duration_minutes += STRETCH_MINUTES * STRETCHES.len() as f64;

    WorkoutPlan {
        total_calories: calories,
        intensity,
        duration_minutes,
        sections: vec![
            PlanSection {
                name: "Cardio".to_string(),
                exercises: cardio,
            },
            PlanSection {
                name: "Strength".to_string(),
                exercises: strength,
            },
            PlanSection {
                name: "Flexibility".to_string(),
                exercises: flexibility,
            },
        ],
    }
}

impl ExercisePlan {
    /// Summary to log once the plan has been completed.
    pub fn to_summary(&self) -> WorkoutSummary {
        WorkoutSummary {
            calories_burned: self.total_calories,
            duration_minutes: Some(self.duration_minutes.ceil()),
            intensity: Some(self.intensity),
            exercises: self.exercises.iter().cloned().map(ExerciseEntry::from).collect(),
            logged_at: String::new(),
        }
    }
}

impl WorkoutPlan {
    /// Summary to log once the routine has been completed.
    pub fn to_summary(&self) -> WorkoutSummary {
        WorkoutSummary {
            calories_burned: self.total_calories,
            duration_minutes: Some(self.duration_minutes.ceil()),
            intensity: Some(self.intensity),
            exercises: self
                .sections
                .iter()
                .flat_map(|s| s.exercises.iter().cloned())
                .map(ExerciseEntry::from)
                .collect(),
            logged_at: String::new(),
        }
    }
}
