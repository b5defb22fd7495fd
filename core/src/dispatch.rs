//! User actions and the single mutation each one performs.
//!
//! Callers turn an input event into an [`Action`], run it with
//! [`Tracker::apply`], then render once from the resulting state.

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::db::DurableStore;
use crate::models::{MealCategory, MealRecord, TrackerState, parse_goal};
use crate::tracker::{ImportOutcome, Tracker};
use crate::transfer::DecodeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddMeal {
        name: String,
        category: MealCategory,
        calories: i64,
        timestamp: Option<DateTime<Utc>>,
    },
    DeleteMeal {
        id: String,
    },
    /// Callers must have confirmed with the user.
    ClearAll,
    /// Raw goal input; anything that is not a positive number means the
    /// default goal.
    SetGoal {
        input: String,
    },
    /// Callers must have confirmed with the user.
    Import {
        document: String,
    },
    /// Replace everything with a document the caller already decoded.
    /// Callers must have confirmed with the user.
    Replace {
        state: TrackerState,
    },
}

#[derive(Debug)]
pub enum Outcome {
    Added(MealRecord),
    Rejected,
    Deleted { id: String, found: bool },
    Cleared { removed: usize },
    GoalSet { goal: i64 },
    Imported { meals: usize },
    ImportFailed(DecodeError),
}

impl Outcome {
    /// Whether the action changed nothing because its input was refused.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Outcome::Rejected | Outcome::ImportFailed(_))
    }
}

impl<S: DurableStore> Tracker<S> {
    pub fn apply(&mut self, action: Action) -> Result<Outcome> {
        let outcome = match action {
            Action::AddMeal {
                name,
                category,
                calories,
                timestamp,
            } => match self.add(&name, category, calories, timestamp)? {
                Some(record) => Outcome::Added(record),
                None => Outcome::Rejected,
            },
            Action::DeleteMeal { id } => {
                let found = self.remove(&id)?;
                Outcome::Deleted { id, found }
            }
            Action::ClearAll => Outcome::Cleared {
                removed: self.clear()?,
            },
            Action::SetGoal { input } => Outcome::GoalSet {
                goal: self.set_goal(parse_goal(&input))?,
            },
            Action::Import { document } => match self.import(&document)? {
                ImportOutcome::Replaced { meals } => Outcome::Imported { meals },
                ImportOutcome::Refused(e) => Outcome::ImportFailed(e),
            },
            Action::Replace { state } => {
                let meals = state.meals.len();
                self.replace_all(state)?;
                Outcome::Imported { meals }
            }
        };
        Ok(outcome)
    }
}
