// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! GFit Tracker: fitness profile and daily calorie ledger backend
//!
//! This crate provides the HTTP API for signup/login, the dashboard
//! (profile, workout logging, daily calorie records) and the exercise
//! calorie calculators.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FitnessStore;
use services::{AccountService, LedgerService};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn FitnessStore>,
    pub accounts: AccountService,
    pub ledger: LedgerService,
}

impl AppState {
    /// Wire the services around one store.
    pub fn new(config: Config, store: Arc<dyn FitnessStore>) -> Self {
        Self {
            accounts: AccountService::new(store.clone()),
            ledger: LedgerService::new(store.clone()),
            config,
            store,
        }
    }
}
