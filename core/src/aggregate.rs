//! Derived figures over the rolling calendar window.
//!
//! Everything here is a pure function of the state and an explicit `today`,
//! so the same inputs always produce the same dashboard.

use chrono::{Days, Local, NaiveDate};
use serde::Serialize;

use crate::models::{MealRecord, TrackerState, normalize_goal};

/// Length of the default aggregation window.
pub const WEEK_DAYS: usize = 7;

/// Calories logged on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayTotal {
    pub date: NaiveDate,
    pub calories: i64,
}

impl DayTotal {
    /// Short weekday name, e.g. `Mon`.
    #[must_use]
    pub fn label(&self) -> String {
        self.date.format("%a").to_string()
    }
}

/// Current local calendar date.
#[must_use]
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// The `window_size` days ending at `today`, oldest first.
#[must_use]
pub fn window_days(today: NaiveDate, window_size: usize) -> Vec<NaiveDate> {
    (0..window_size)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(offset as u64)))
        .collect()
}

/// Per-day calorie totals for the window ending at `today`. Days without
/// meals are present with 0; meals outside the window are ignored. Sums
/// saturate at `i64::MAX`.
#[must_use]
pub fn daily_totals(state: &TrackerState, today: NaiveDate, window_size: usize) -> Vec<DayTotal> {
    let mut totals: Vec<DayTotal> = window_days(today, window_size)
        .into_iter()
        .map(|date| DayTotal { date, calories: 0 })
        .collect();

    let Some(start) = totals.first().map(|d| d.date) else {
        return totals;
    };

    for meal in &state.meals {
        let offset = (meal.local_date() - start).num_days();
        if let Some(bucket) = usize::try_from(offset)
            .ok()
            .and_then(|i| totals.get_mut(i))
        {
            bucket.calories = bucket.calories.saturating_add(meal.calories);
        }
    }

    totals
}

#[must_use]
pub fn today_total(state: &TrackerState, today: NaiveDate) -> i64 {
    state
        .meals
        .iter()
        .filter(|m| m.local_date() == today)
        .map(|m| m.calories)
        .fold(0, i64::saturating_add)
}

#[must_use]
pub fn weekly_total(totals: &[DayTotal]) -> i64 {
    totals
        .iter()
        .map(|d| d.calories)
        .fold(0, i64::saturating_add)
}

/// Mean over the whole window, counting empty days, rounded to the nearest
/// calorie.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_per_day(totals: &[DayTotal]) -> i64 {
    if totals.is_empty() {
        return 0;
    }
    (weekly_total(totals) as f64 / totals.len() as f64).round() as i64
}

/// Rounded percentage of the goal, unclamped. Zero for a non-positive goal.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percent_of_goal(total: i64, goal: i64) -> i64 {
    if goal <= 0 {
        return 0;
    }
    (total as f64 / goal as f64 * 100.0).round() as i64
}

/// Progress bar width: [`percent_of_goal`] clamped to `0..=100`.
#[must_use]
pub fn progress_percent(total: i64, goal: i64) -> i64 {
    percent_of_goal(total, goal).clamp(0, 100)
}

/// Meals ordered most recent first.
#[must_use]
pub fn meals_newest_first(state: &TrackerState) -> Vec<&MealRecord> {
    let mut meals: Vec<&MealRecord> = state.meals.iter().collect();
    meals.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    meals
}

/// Everything the dashboard shows after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub date: NaiveDate,
    pub today_total: i64,
    pub goal: i64,
    pub percent_of_goal: i64,
    pub progress_percent: i64,
    pub goal_reached: bool,
    pub weekly_total: i64,
    pub average_per_day: i64,
    pub days: Vec<DayTotal>,
}

impl Dashboard {
    #[must_use]
    pub fn build(state: &TrackerState, today: NaiveDate) -> Self {
        let goal = normalize_goal(state.goal);
        let days = daily_totals(state, today, WEEK_DAYS);
        let today_total = days.last().map_or(0, |d| d.calories);

        Self {
            date: today,
            today_total,
            goal,
            percent_of_goal: percent_of_goal(today_total, goal),
            progress_percent: progress_percent(today_total, goal),
            goal_reached: today_total >= goal,
            weekly_total: weekly_total(&days),
            average_per_day: average_per_day(&days),
            days,
        }
    }

    #[must_use]
    pub fn for_today(state: &TrackerState) -> Self {
        Self::build(state, local_today())
    }
}
