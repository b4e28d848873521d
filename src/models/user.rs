// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{lenient, WorkoutSummary};

/// User profile stored in Firestore.
///
/// Keyed by normalized email (`users/{email}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,
    /// PBKDF2 hash (see `services::password`); empty for profiles created
    /// without signup, which can never log in.
    #[serde(default)]
    pub password_hash: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub fitness_level: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub fitness_goal: Option<String>,
    /// Body weight in kilograms
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub daily_calories_target: Option<f64>,
    #[serde(default)]
    pub profile_pic: Option<String>,
    #[serde(default)]
    pub recent_workout: Option<WorkoutSummary>,
    #[serde(default)]
    pub total_lifetime_calories_burned: f64,
    /// Append-only
    #[serde(default)]
    pub workout_history: Vec<WorkoutSummary>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl User {
    /// Empty profile for `email`.
    pub fn new(email: &str, now: &str) -> Self {
        Self {
            email: email.to_string(),
            password_hash: String::new(),
            full_name: None,
            fitness_level: None,
            age: None,
            gender: None,
            phone: None,
            fitness_goal: None,
            weight: None,
            daily_calories_target: None,
            profile_pic: None,
            recent_workout: None,
            total_lifetime_calories_burned: 0.0,
            workout_history: Vec::new(),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    /// Merge the supplied profile fields; absent fields are left as they are.
    pub fn apply_profile(&mut self, update: &ProfileUpdate, now: &str) {
        fn merge<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if let Some(v) = value {
                *slot = Some(v.clone());
            }
        }

        merge(&mut self.full_name, &update.full_name);
        merge(&mut self.fitness_level, &update.fitness_level);
        merge(&mut self.age, &update.age);
        merge(&mut self.gender, &update.gender);
        merge(&mut self.phone, &update.phone);
        merge(&mut self.fitness_goal, &update.fitness_goal);
        merge(&mut self.weight, &update.weight);
        merge(&mut self.daily_calories_target, &update.daily_calories_target);
        merge(&mut self.profile_pic, &update.profile_pic);
        self.updated_at = now.to_string();
    }

    /// Record a completed workout on the profile.
    pub fn record_workout(&mut self, summary: WorkoutSummary, now: &str) {
        self.total_lifetime_calories_burned += summary.calories_burned;
        self.recent_workout = Some(summary.clone());
        self.workout_history.push(summary);
        self.updated_at = now.to_string();
    }
}

/// Editable profile fields.
///
/// Unknown fields in the request body are ignored, so the ledger fields
/// (history, lifetime total) and the password cannot be written through a
/// profile update.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[validate(length(max = 100))]
    pub full_name: Option<String>,
    #[validate(length(max = 50))]
    pub fitness_level: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_u32")]
    #[validate(range(max = 150))]
    pub age: Option<u32>,
    #[validate(length(max = 50))]
    pub gender: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(length(max = 200))]
    pub fitness_goal: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_f64")]
    #[validate(range(min = 0.0, max = 1000.0))]
    pub weight: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_f64")]
    #[validate(range(min = 0.0, max = 100000.0))]
    pub daily_calories_target: Option<f64>,
    /// Image URL, site-relative path or `data:image/...` URL
    #[validate(
        length(max = MAX_PROFILE_PIC_LEN),
        custom(function = "validate_profile_pic")
    )]
    pub profile_pic: Option<String>,
}

/// Upper bound on a stored profile picture, data URLs included.
///
/// Leaves room for the rest of the user document under Firestore's 1 MiB limit.
pub const MAX_PROFILE_PIC_LEN: u64 = 700_000;

pub fn validate_profile_pic(pic: &str) -> Result<(), ValidationError> {
    let lower = pic.get(..16).unwrap_or(pic).to_ascii_lowercase();
    if pic.is_empty()
        || pic.starts_with('/')
        || lower.starts_with("https://")
        || lower.starts_with("http://")
        || lower.starts_with("data:image/")
    {
        return Ok(());
    }
    let mut error = ValidationError::new("profile_pic");
    error.message = Some("Profile picture must be an image URL".into());
    Err(error)
}

/// Profile as returned to clients (no password hash).
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub email: String,
    pub full_name: Option<String>,
    pub fitness_level: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub fitness_goal: Option<String>,
    pub weight: Option<f64>,
    pub daily_calories_target: Option<f64>,
    pub profile_pic: Option<String>,
    pub recent_workout: Option<WorkoutSummary>,
    pub total_lifetime_calories_burned: f64,
    pub workout_history: Vec<WorkoutSummary>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            full_name: user.full_name,
            fitness_level: user.fitness_level,
            age: user.age,
            gender: user.gender,
            phone: user.phone,
            fitness_goal: user.fitness_goal,
            weight: user.weight,
            daily_calories_target: user.daily_calories_target,
            profile_pic: user.profile_pic,
            recent_workout: user.recent_workout,
            total_lifetime_calories_burned: user.total_lifetime_calories_burned,
            workout_history: user.workout_history,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Normalize an email for use as a key: trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(calories: f64) -> WorkoutSummary {
        WorkoutSummary {
            calories_burned: calories,
            duration_minutes: Some(20.0),
            intensity: None,
            exercises: vec![],
            logged_at: "2025-01-01T10:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_apply_profile_merges_only_supplied_fields() {
        let mut user = User::new("a@example.com", "t0");
        user.full_name = Some("Old Name".to_string());
        user.weight = Some(80.0);

        let update = ProfileUpdate {
            full_name: Some("New Name".to_string()),
            daily_calories_target: Some(2200.0),
            ..Default::default()
        };
        user.apply_profile(&update, "t1");

        assert_eq!(user.full_name.as_deref(), Some("New Name"));
        assert_eq!(user.weight, Some(80.0));
        assert_eq!(user.daily_calories_target, Some(2200.0));
        assert_eq!(user.updated_at, "t1");
        assert_eq!(user.created_at, "t0");
    }

    #[test]
    fn test_record_workout_accumulates() {
        let mut user = User::new("a@example.com", "t0");
        user.total_lifetime_calories_burned = 1000.0;

        user.record_workout(summary(150.0), "t1");

        assert_eq!(user.total_lifetime_calories_burned, 1150.0);
        assert_eq!(user.workout_history.len(), 1);
        assert_eq!(user.recent_workout, Some(summary(150.0)));
    }

    #[test]
    fn test_profile_update_ignores_ledger_fields() {
        let update: ProfileUpdate = serde_json::from_value(serde_json::json!({
            "fullName": "Sam",
            "totalLifetimeCaloriesBurned": 999999,
            "workoutHistory": [],
            "password": "hunter2",
        }))
        .unwrap();
        assert_eq!(update.full_name.as_deref(), Some("Sam"));
    }

    #[test]
    fn test_profile_update_validation() {
        let update = ProfileUpdate {
            age: Some(400),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = ProfileUpdate {
            weight: Some(-5.0),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = ProfileUpdate {
            age: Some(30),
            weight: Some(72.5),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_profile_update_accepts_blank_form_numbers() {
        let update: ProfileUpdate = serde_json::from_value(serde_json::json!({
            "fullName": "Sam",
            "age": "",
            "weight": "70",
            "dailyCaloriesTarget": null,
        }))
        .unwrap();
        assert_eq!(update.age, None);
        assert_eq!(update.weight, Some(70.0));
        assert_eq!(update.daily_calories_target, None);
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_profile_pic_sources() {
        let data_url = format!("data:image/jpeg;base64,{}", "A".repeat(200_000));
        for pic in [
            "/placeholder.svg?height=200&width=200",
            "https://cdn.example.com/a.png",
            data_url.as_str(),
        ] {
            let update = ProfileUpdate {
                profile_pic: Some(pic.to_string()),
                ..Default::default()
            };
            assert!(update.validate().is_ok(), "rejected {}", &pic[..20]);
        }

        for pic in [
            "javascript:alert(1)".to_string(),
            "data:text/html,<b>hi</b>".to_string(),
            format!("data:image/png;base64,{}", "A".repeat(MAX_PROFILE_PIC_LEN as usize)),
        ] {
            let update = ProfileUpdate {
                profile_pic: Some(pic),
                ..Default::default()
            };
            assert!(update.validate().is_err());
        }
    }

    #[test]
    fn test_profile_response_has_no_password() {
        let mut user = User::new("a@example.com", "t0");
        user.password_hash = "secret-hash".to_string();
        let json = serde_json::to_value(UserProfile::from(user)).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["email"], "a@example.com");
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Sam@Example.COM "), "sam@example.com");
    }
}
