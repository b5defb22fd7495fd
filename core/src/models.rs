use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Daily calorie goal used whenever no positive goal has been set.
pub const DEFAULT_GOAL: i64 = 2000;

/// Upper bound on the calories of a single meal.
pub const MAX_MEAL_CALORIES: i64 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealCategory {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

pub const MEAL_CATEGORIES: &[MealCategory] = &[
    MealCategory::Breakfast,
    MealCategory::Lunch,
    MealCategory::Dinner,
    MealCategory::Snack,
];

impl MealCategory {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MealCategory::Breakfast => "breakfast",
            MealCategory::Lunch => "lunch",
            MealCategory::Dinner => "dinner",
            MealCategory::Snack => "snack",
        }
    }
}

impl fmt::Display for MealCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        match MEAL_CATEGORIES.iter().find(|c| c.as_str() == lower) {
            Some(category) => Ok(*category),
            None => {
                let valid: Vec<&str> = MEAL_CATEGORIES.iter().map(|c| c.as_str()).collect();
                bail!(
                    "Invalid meal category '{s}'. Must be one of: {}",
                    valid.join(", ")
                )
            }
        }
    }
}

/// One logged meal. Records are never edited in place; an import replaces
/// the whole collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealRecord {
    pub id: String,
    pub name: String,
    pub category: MealCategory,
    pub calories: i64,
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
}

impl MealRecord {
    /// Build a record with a fresh id. Callers validate name and calories.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        category: MealCategory,
        calories: i64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            category,
            calories,
            timestamp,
        }
    }

    /// Calendar day of the record in the local time zone.
    #[must_use]
    pub fn local_date(&self) -> NaiveDate {
        self.timestamp.with_timezone(&Local).date_naive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerState {
    pub meals: Vec<MealRecord>,
    pub goal: i64,
}

impl Default for TrackerState {
    fn default() -> Self {
        Self {
            meals: Vec::new(),
            goal: DEFAULT_GOAL,
        }
    }
}

/// Non-positive goals fall back to [`DEFAULT_GOAL`].
#[must_use]
pub fn normalize_goal(goal: i64) -> i64 {
    if goal > 0 { goal } else { DEFAULT_GOAL }
}

/// Parse user goal input. Anything that is not a positive number becomes
/// [`DEFAULT_GOAL`]; fractional input is rounded.
#[must_use]
pub fn parse_goal(input: &str) -> i64 {
    match input.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.5 && v < 9.0e15 => v.round() as i64,
        _ => DEFAULT_GOAL,
    }
}

/// A meal is accepted when its trimmed name is non-empty and its calorie
/// count is in `1..=MAX_MEAL_CALORIES`.
#[must_use]
pub fn is_valid_meal(name: &str, calories: i64) -> bool {
    !name.trim().is_empty() && (1..=MAX_MEAL_CALORIES).contains(&calories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_category_from_str() {
        assert_eq!(
            "breakfast".parse::<MealCategory>().unwrap(),
            MealCategory::Breakfast
        );
        assert_eq!("LUNCH".parse::<MealCategory>().unwrap(), MealCategory::Lunch);
        assert_eq!(
            " Dinner ".parse::<MealCategory>().unwrap(),
            MealCategory::Dinner
        );
        assert_eq!("snack".parse::<MealCategory>().unwrap(), MealCategory::Snack);
    }

    #[test]
    fn test_category_from_str_invalid() {
        let err = "brunch".parse::<MealCategory>().unwrap_err();
        assert!(err.to_string().contains("breakfast, lunch, dinner, snack"));
        assert!("".parse::<MealCategory>().is_err());
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&MealCategory::Snack).unwrap();
        assert_eq!(json, "\"snack\"");
    }

    #[test]
    fn test_record_serializes_timestamp_as_date() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 0).unwrap();
        let record = MealRecord::new("Oats", MealCategory::Breakfast, 350, ts);
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["name"], "Oats");
        assert_eq!(value["category"], "breakfast");
        assert_eq!(value["calories"], 350);
        assert!(value["date"].as_str().unwrap().starts_with("2025-03-01T08:30:00"));
        assert!(value.get("timestamp").is_none());
    }

    #[test]
    fn test_new_records_get_distinct_ids() {
        let ts = Utc::now();
        let a = MealRecord::new("A", MealCategory::Snack, 10, ts);
        let b = MealRecord::new("A", MealCategory::Snack, 10, ts);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_default_state() {
        let state = TrackerState::default();
        assert!(state.meals.is_empty());
        assert_eq!(state.goal, DEFAULT_GOAL);
    }

    #[test]
    fn test_normalize_goal() {
        assert_eq!(normalize_goal(1800), 1800);
        assert_eq!(normalize_goal(0), DEFAULT_GOAL);
        assert_eq!(normalize_goal(-5), DEFAULT_GOAL);
    }

    #[test]
    fn test_parse_goal() {
        assert_eq!(parse_goal("1800"), 1800);
        assert_eq!(parse_goal(" 2200 "), 2200);
        assert_eq!(parse_goal("1799.6"), 1800);
        assert_eq!(parse_goal("0"), DEFAULT_GOAL);
        assert_eq!(parse_goal("-100"), DEFAULT_GOAL);
        assert_eq!(parse_goal("lots"), DEFAULT_GOAL);
        assert_eq!(parse_goal(""), DEFAULT_GOAL);
        assert_eq!(parse_goal("NaN"), DEFAULT_GOAL);
    }

    #[test]
    fn test_is_valid_meal() {
        assert!(is_valid_meal("Oats", 350));
        assert!(!is_valid_meal("", 350));
        assert!(!is_valid_meal("   ", 350));
        assert!(!is_valid_meal("Oats", 0));
        assert!(!is_valid_meal("Oats", -20));
    }

    #[test]
    fn test_is_valid_meal_calorie_ceiling() {
        assert!(is_valid_meal("Feast", MAX_MEAL_CALORIES));
        assert!(!is_valid_meal("Feast", MAX_MEAL_CALORIES + 1));
        assert!(!is_valid_meal("Feast", i64::MAX));
    }
}
