// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Field deserializers for values typed in browser forms.
//!
//! Form state starts out as `""` and numeric inputs can arrive as strings, so
//! numeric fields accept a number, a numeric string, `""` or `null`.

use serde::de::{DeserializeOwned, Error};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn form_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| D::Error::custom("number out of range")),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected a number, got \"{s}\""))),
        Some(other) => Err(D::Error::custom(format!("expected a number, got {other}"))),
    }
}

/// `Option<f64>` from a form field.
pub fn optional_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    form_number(deserializer)
}

/// `Option<u32>` from a form field; fractions and negatives are rejected.
pub fn optional_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match form_number(deserializer)? {
        None => Ok(None),
        Some(n) if n.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&n) => Ok(Some(n as u32)),
        Some(n) => Err(D::Error::custom(format!("expected a whole number, got {n}"))),
    }
}

/// Any value that does not parse as `T` becomes `None`.
pub fn or_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .and_then(|value| serde_json::from_value(value).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "optional_u32")]
        age: Option<u32>,
        #[serde(default, deserialize_with = "optional_f64")]
        weight: Option<f64>,
    }

    fn form(value: Value) -> Result<Form, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn test_blank_and_null_are_none() {
        for value in [json!({"age": "", "weight": null}), json!({"age": "  "}), json!({})] {
            let parsed = form(value).unwrap();
            assert_eq!(parsed.age, None);
            assert_eq!(parsed.weight, None);
        }
    }

    #[test]
    fn test_numbers_and_numeric_strings() {
        let parsed = form(json!({"age": "31", "weight": 70.5})).unwrap();
        assert_eq!(parsed.age, Some(31));
        assert_eq!(parsed.weight, Some(70.5));

        let parsed = form(json!({"age": 31.0, "weight": " 68 "})).unwrap();
        assert_eq!(parsed.age, Some(31));
        assert_eq!(parsed.weight, Some(68.0));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(form(json!({"age": "abc"})).is_err());
        assert!(form(json!({"age": 30.5})).is_err());
        assert!(form(json!({"age": -1})).is_err());
        assert!(form(json!({"weight": true})).is_err());
        assert!(form(json!({"weight": [70]})).is_err());
    }
}
