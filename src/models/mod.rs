// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod daily;
pub mod lenient;
pub mod user;
pub mod workout;

pub use daily::{DailyDelta, DailyRecord};
pub use user::{normalize_email, ProfileUpdate, User, UserProfile};
pub use workout::{AmountUnit, ExerciseEntry, ExerciseResult, Intensity, WorkoutSummary};
