//! Import/export of the full tracker state as a JSON document.
//!
//! Exported documents carry a `meals` array and a `goal` number. Decoding is
//! the only place untrusted documents enter the tracker, so every field is
//! checked before a [`TrackerState`] is produced.

use std::collections::HashSet;

use anyhow::{Context, Result};
use serde_json::Value;
use thiserror::Error;

use crate::models::{DEFAULT_GOAL, MAX_MEAL_CALORIES, MealRecord, TrackerState, normalize_goal};

/// Default file name offered for exports.
pub const EXPORT_FILE_NAME: &str = "nutriwise_export.json";

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Failed to read file: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("Invalid file format: {0}")]
    InvalidFormat(&'static str),

    #[error("Invalid meal at position {index}: {reason}")]
    InvalidMeal { index: usize, reason: String },

    #[error("Invalid file format: meal id '{0}' appears more than once")]
    DuplicateId(String),
}

/// Pretty-printed document suitable for saving and importing later.
pub fn export_document(state: &TrackerState) -> Result<String> {
    serde_json::to_string_pretty(state).context("Failed to serialize tracker state")
}

/// Compact encoding used for the durable store.
pub fn encode_state(state: &TrackerState) -> Result<String> {
    serde_json::to_string(state).context("Failed to serialize tracker state")
}

/// Parse and validate a document.
///
/// The document must be an object with a `meals` array whose entries all
/// have the meal record shape. A missing or non-positive `goal` becomes
/// [`DEFAULT_GOAL`].
pub fn decode_document(text: &str) -> Result<TrackerState, DecodeError> {
    let value: Value = serde_json::from_str(text).map_err(DecodeError::Malformed)?;

    let Value::Object(mut fields) = value else {
        return Err(DecodeError::InvalidFormat("expected a JSON object"));
    };

    let items = match fields.remove("meals") {
        Some(Value::Array(items)) => items,
        Some(_) => return Err(DecodeError::InvalidFormat("`meals` must be an array")),
        None => return Err(DecodeError::InvalidFormat("missing `meals` array")),
    };

    let mut meals = Vec::with_capacity(items.len());
    let mut seen = HashSet::new();
    for (index, item) in items.into_iter().enumerate() {
        let meal = decode_meal(index, item)?;
        if !seen.insert(meal.id.clone()) {
            return Err(DecodeError::DuplicateId(meal.id));
        }
        meals.push(meal);
    }

    let goal = fields.get("goal").map_or(DEFAULT_GOAL, goal_from_value);

    Ok(TrackerState { meals, goal })
}

fn decode_meal(index: usize, item: Value) -> Result<MealRecord, DecodeError> {
    let meal: MealRecord = serde_json::from_value(item).map_err(|e| DecodeError::InvalidMeal {
        index,
        reason: e.to_string(),
    })?;

    let reason = if meal.id.trim().is_empty() {
        Some("id must not be empty")
    } else if meal.name.trim().is_empty() {
        Some("name must not be empty")
    } else if meal.calories < 0 {
        Some("calories must not be negative")
    } else if meal.calories > MAX_MEAL_CALORIES {
        Some("calories exceed the per-meal maximum")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(DecodeError::InvalidMeal {
            index,
            reason: reason.to_string(),
        }),
        None => Ok(meal),
    }
}

fn goal_from_value(value: &Value) -> i64 {
    let goal = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|v| v.is_finite()).map(|v| v.round() as i64)),
        Value::String(s) => Some(crate::models::parse_goal(s)),
        _ => None,
    };
    goal.map_or(DEFAULT_GOAL, normalize_goal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MealCategory;
    use chrono::{TimeZone, Utc};

    fn sample_state() -> TrackerState {
        TrackerState {
            meals: vec![
                MealRecord::new(
                    "Oats",
                    MealCategory::Breakfast,
                    350,
                    Utc.with_ymd_and_hms(2025, 3, 1, 7, 45, 0).unwrap(),
                ),
                MealRecord::new(
                    "Soup",
                    MealCategory::Dinner,
                    420,
                    Utc.with_ymd_and_hms(2025, 3, 2, 19, 5, 12).unwrap(),
                ),
            ],
            goal: 1800,
        }
    }

    #[test]
    fn test_export_then_decode_roundtrip() {
        let state = sample_state();
        let doc = export_document(&state).unwrap();
        let decoded = decode_document(&doc).unwrap();
        assert_eq!(decoded, state);
    }

    #[test]
    fn test_export_is_pretty_and_complete() {
        let doc = export_document(&sample_state()).unwrap();
        assert!(doc.contains('\n'));
        assert!(doc.contains("\"meals\""));
        assert!(doc.contains("\"goal\": 1800"));
    }

    #[test]
    fn test_encode_state_is_compact() {
        let encoded = encode_state(&TrackerState::default()).unwrap();
        assert_eq!(encoded, "{\"meals\":[],\"goal\":2000}");
    }

    #[test]
    fn test_decode_browser_export() {
        let doc = r#"{
          "meals": [
            {
              "id": "lq2x9k3abc12",
              "name": "Greek yogurt",
              "category": "snack",
              "calories": 150,
              "date": "2025-03-04T10:15:00.000Z"
            }
          ],
          "goal": 2100
        }"#;

        let state = decode_document(doc).unwrap();
        assert_eq!(state.goal, 2100);
        assert_eq!(state.meals.len(), 1);
        assert_eq!(state.meals[0].id, "lq2x9k3abc12");
        assert_eq!(state.meals[0].category, MealCategory::Snack);
        assert_eq!(
            state.meals[0].timestamp,
            Utc.with_ymd_and_hms(2025, 3, 4, 10, 15, 0).unwrap()
        );
    }

    #[test]
    fn test_decode_meals_not_an_array() {
        let err = decode_document(r#"{"meals": "not-an-array", "goal": 2000}"#).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidFormat(_)));
        assert!(err.to_string().contains("Invalid file format"));
    }

    #[test]
    fn test_decode_missing_meals() {
        let err = decode_document(r#"{"goal": 2000}"#).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidFormat(_)));
    }

    #[test]
    fn test_decode_top_level_array() {
        let err = decode_document("[]").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidFormat(_)));
    }

    #[test]
    fn test_decode_malformed_json() {
        let err = decode_document("{\"meals\": [").unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(_)));
        assert!(err.to_string().starts_with("Failed to read file: "));
    }

    #[test]
    fn test_decode_rejects_unknown_category() {
        let doc = r#"{"meals": [{"id": "a", "name": "Cake", "category": "dessert",
            "calories": 400, "date": "2025-03-04T10:15:00Z"}]}"#;
        let err = decode_document(doc).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidMeal { index: 0, .. }));
    }

    #[test]
    fn test_decode_rejects_negative_calories() {
        let doc = r#"{"meals": [
            {"id": "a", "name": "Tea", "category": "snack", "calories": 0, "date": "2025-03-04T10:15:00Z"},
            {"id": "b", "name": "Cake", "category": "snack", "calories": -5, "date": "2025-03-04T10:15:00Z"}
        ]}"#;
        let err = decode_document(doc).unwrap_err();
        match err {
            DecodeError::InvalidMeal { index, reason } => {
                assert_eq!(index, 1);
                assert!(reason.contains("negative"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_decode_rejects_oversized_calories() {
        let doc = r#"{"meals": [
            {"id": "a", "name": "Huge", "category": "snack", "calories": 9223372036854775807, "date": "2025-03-04T10:15:00Z"},
            {"id": "b", "name": "One", "category": "snack", "calories": 1, "date": "2025-03-04T10:16:00Z"}
        ]}"#;
        match decode_document(doc).unwrap_err() {
            DecodeError::InvalidMeal { index, reason } => {
                assert_eq!(index, 0);
                assert!(reason.contains("maximum"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_decode_accepts_calorie_ceiling() {
        let doc = format!(
            r#"{{"meals": [{{"id": "a", "name": "Feast", "category": "dinner",
                "calories": {MAX_MEAL_CALORIES}, "date": "2025-03-04T19:00:00Z"}}]}}"#
        );
        let state = decode_document(&doc).unwrap();
        assert_eq!(state.meals[0].calories, MAX_MEAL_CALORIES);
    }

    #[test]
    fn test_decode_rejects_missing_timestamp() {
        let doc = r#"{"meals": [{"id": "a", "name": "Tea", "category": "snack", "calories": 5}]}"#;
        assert!(matches!(
            decode_document(doc).unwrap_err(),
            DecodeError::InvalidMeal { index: 0, .. }
        ));
    }

    #[test]
    fn test_decode_rejects_duplicate_ids() {
        let doc = r#"{"meals": [
            {"id": "a", "name": "Tea", "category": "snack", "calories": 5, "date": "2025-03-04T10:15:00Z"},
            {"id": "a", "name": "Toast", "category": "breakfast", "calories": 90, "date": "2025-03-04T08:00:00Z"}
        ]}"#;
        let err = decode_document(doc).unwrap_err();
        assert!(matches!(err, DecodeError::DuplicateId(ref id) if id == "a"));
    }

    #[test]
    fn test_decode_goal_fallbacks() {
        let cases = [
            (r#"{"meals": []}"#, DEFAULT_GOAL),
            (r#"{"meals": [], "goal": 0}"#, DEFAULT_GOAL),
            (r#"{"meals": [], "goal": -300}"#, DEFAULT_GOAL),
            (r#"{"meals": [], "goal": null}"#, DEFAULT_GOAL),
            (r#"{"meals": [], "goal": "1900"}"#, 1900),
            (r#"{"meals": [], "goal": 1750.4}"#, 1750),
            (r#"{"meals": [], "goal": 2500}"#, 2500),
        ];
        for (doc, expected) in cases {
            assert_eq!(decode_document(doc).unwrap().goal, expected, "{doc}");
        }
    }
}
