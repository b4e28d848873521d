// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account service: signup and credential checks.

use std::sync::Arc;

use crate::db::FitnessStore;
use crate::error::{AppError, Result};
use crate::models::{normalize_email, ProfileUpdate, User};
use crate::services::password;
use crate::time_utils::format_utc_rfc3339;

/// Returned for every failed login, whether or not the email is known.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const USER_EXISTS: &str = "User already exists";

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn FitnessStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn FitnessStore>) -> Self {
        Self { store }
    }

    /// Create a new account.
    ///
    /// Fails without touching the existing document if the email is taken.
    pub async fn signup(&self, email: &str, password: &str, profile: &ProfileUpdate) -> Result<User> {
        let email = normalize_email(email);
        let now = format_utc_rfc3339(chrono::Utc::now());

        let mut user = User::new(&email, &now);
        user.apply_profile(profile, &now);
        user.password_hash = password::hash_password(password)?;

        if !self.store.create_user(&user).await? {
            tracing::info!(email = %email, "Signup rejected: user already exists");
            return Err(AppError::BadRequest(USER_EXISTS.to_string()));
        }

        tracing::info!(email = %email, "User signed up");
        Ok(user)
    }

    /// Check credentials and return the matching user.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let email = normalize_email(email);

        let Some(user) = self.store.get_user(&email).await? else {
            password::verify_dummy(password);
            tracing::info!("Login failed");
            return Err(AppError::BadRequest(INVALID_CREDENTIALS.to_string()));
        };

        if !password::verify_password(password, &user.password_hash) {
            tracing::info!("Login failed");
            return Err(AppError::BadRequest(INVALID_CREDENTIALS.to_string()));
        }

        tracing::info!(email = %email, "User logged in");
        Ok(user)
    }
}
