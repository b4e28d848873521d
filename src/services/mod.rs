// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod account;
pub mod calculator;
pub mod ledger;
pub mod password;

pub use account::AccountService;
pub use calculator::{balanced_routine, exercise_plan, CalculatorError, ExercisePlan, WorkoutPlan};
pub use ledger::{DailyOutcome, DashboardView, LedgerService, WorkoutLogged};
