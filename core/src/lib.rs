//! Core library for NutriWise: meal records, durable storage, and the
//! rolling seven-day calorie aggregation.

pub mod aggregate;
pub mod db;
pub mod dispatch;
pub mod models;
pub mod tracker;
pub mod transfer;

pub use aggregate::{DayTotal, Dashboard, WEEK_DAYS};
pub use db::{Database, DurableStore};
pub use dispatch::{Action, Outcome};
pub use models::{DEFAULT_GOAL, MAX_MEAL_CALORIES, MealCategory, MealRecord, TrackerState};
pub use tracker::{ImportOutcome, STORAGE_KEY, Tracker};
pub use transfer::DecodeError;
