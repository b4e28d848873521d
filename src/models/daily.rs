// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user, per-date calorie ledger.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Daily calorie aggregate stored in Firestore.
///
/// Stored at `daily_records/{email}_{date}`; the document ID is the
/// (email, date) uniqueness key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub email: String,
    /// UTC date (`YYYY-MM-DD`)
    pub date: String,
    #[serde(default)]
    pub calories_consumed: f64,
    #[serde(default)]
    pub calories_burned_today: f64,
    /// Daily calorie target captured when the record was created (or last set)
    #[serde(default)]
    pub daily_calories_target_at_record_time: f64,
    #[serde(default)]
    pub updated_at: String,
}

/// Changes carried by a `daily` entry.
///
/// `None` fields leave the stored value untouched; a delta with every field
/// `None` is a no-op. `calories_consumed` is never changed by a daily entry.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DailyDelta {
    /// Overwrites the stored target
    pub target: Option<f64>,
    /// Added to `calories_burned_today`
    pub burned: Option<f64>,
}

impl DailyDelta {
    pub fn is_empty(&self) -> bool {
        self.target.is_none() && self.burned.is_none()
    }
}

impl DailyRecord {
    /// Create a fresh record seeded from `delta`; absent values default to zero.
    pub fn seeded(email: &str, date: &str, delta: &DailyDelta, now: &str) -> Self {
        Self {
            email: email.to_string(),
            date: date.to_string(),
            calories_consumed: 0.0,
            calories_burned_today: delta.burned.unwrap_or(0.0),
            daily_calories_target_at_record_time: delta.target.unwrap_or(0.0),
            updated_at: now.to_string(),
        }
    }

    /// Apply a delta: increment the burned counter and overwrite the target if
    /// supplied.
    ///
    /// Returns `false` (and leaves the record untouched) when the delta is empty.
    pub fn apply(&mut self, delta: &DailyDelta, now: &str) -> bool {
        if delta.is_empty() {
            return false;
        }
        if let Some(target) = delta.target {
            self.daily_calories_target_at_record_time = target;
        }
        if let Some(burned) = delta.burned {
            self.calories_burned_today += burned;
        }
        self.updated_at = now.to_string();
        true
    }

    /// Percentage of the target burned today, capped at 100.
    pub fn progress_percent(burned: f64, target: f64) -> u32 {
        if target <= 0.0 {
            return 0;
        }
        (burned / target * 100.0).round().clamp(0.0, 100.0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> DailyRecord {
        DailyRecord::seeded(
            "a@example.com",
            "2025-01-01",
            &DailyDelta {
                target: Some(2000.0),
                burned: Some(100.0),
            },
            "t0",
        )
    }

    #[test]
    fn test_seeded_defaults_absent_values_to_zero() {
        let rec = DailyRecord::seeded("a@example.com", "2025-01-01", &DailyDelta::default(), "t0");
        assert_eq!(rec.calories_burned_today, 0.0);
        assert_eq!(rec.calories_consumed, 0.0);
        assert_eq!(rec.daily_calories_target_at_record_time, 0.0);
    }

    #[test]
    fn test_apply_increments_and_overwrites_target() {
        let mut rec = record();
        rec.calories_consumed = 300.0;
        let changed = rec.apply(
            &DailyDelta {
                target: Some(2500.0),
                burned: Some(50.0),
            },
            "t1",
        );
        assert!(changed);
        assert_eq!(rec.calories_burned_today, 150.0);
        assert_eq!(rec.calories_consumed, 300.0);
        assert_eq!(rec.daily_calories_target_at_record_time, 2500.0);
        assert_eq!(rec.updated_at, "t1");
    }

    #[test]
    fn test_apply_empty_delta_is_noop() {
        let mut rec = record();
        let before = rec.clone();
        assert!(!rec.apply(&DailyDelta::default(), "t1"));
        assert_eq!(rec, before);
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(DailyRecord::progress_percent(500.0, 2000.0), 25);
        assert_eq!(DailyRecord::progress_percent(3000.0, 2000.0), 100);
        assert_eq!(DailyRecord::progress_percent(10.0, 0.0), 0);
        assert_eq!(DailyRecord::progress_percent(1.0, 3.0), 33);
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["caloriesBurnedToday"], 100.0);
        assert_eq!(json["dailyCaloriesTargetAtRecordTime"], 2000.0);
        assert_eq!(json["caloriesConsumed"], 0.0);
    }
}
