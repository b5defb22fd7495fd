use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::db::DurableStore;
use crate::models::{MealCategory, MealRecord, TrackerState, is_valid_meal, normalize_goal};
use crate::transfer::{DecodeError, decode_document, encode_state};

/// Key under which the whole tracker state is stored.
pub const STORAGE_KEY: &str = "nutriwise_state_v1";

/// Owns the tracker state and keeps the durable copy in step with it.
///
/// Every mutating method persists before returning.
pub struct Tracker<S: DurableStore> {
    store: S,
    state: TrackerState,
}

impl<S: DurableStore> Tracker<S> {
    /// Load the stored state. Missing or unreadable content yields the
    /// default state; only store failures are returned as errors.
    pub fn load(store: S) -> Result<Self> {
        let state = match store.get_item(STORAGE_KEY)? {
            None => {
                tracing::debug!("No stored state under {STORAGE_KEY}, starting empty");
                TrackerState::default()
            }
            Some(raw) => match decode_document(&raw) {
                Ok(state) => {
                    tracing::debug!("Loaded {} meal(s)", state.meals.len());
                    state
                }
                Err(e) => {
                    tracing::warn!("Ignoring unreadable stored state: {e}");
                    TrackerState::default()
                }
            },
        };
        Ok(Self { store, state })
    }

    #[must_use]
    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn persist(&self) -> Result<()> {
        let encoded = encode_state(&self.state)?;
        self.store.set_item(STORAGE_KEY, &encoded)
    }

    /// Log a meal. Returns `Ok(None)` without touching the state when the
    /// name is blank or calories are not positive.
    pub fn add(
        &mut self,
        name: &str,
        category: MealCategory,
        calories: i64,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<Option<MealRecord>> {
        if !is_valid_meal(name, calories) {
            tracing::debug!("Rejected meal '{name}' with {calories} kcal");
            return Ok(None);
        }

        let record = MealRecord::new(
            name.trim(),
            category,
            calories,
            timestamp.unwrap_or_else(Utc::now),
        );
        self.state.meals.push(record.clone());
        self.persist()?;
        tracing::debug!("Added meal {} ({} kcal)", record.id, record.calories);
        Ok(Some(record))
    }

    /// Remove a meal by id. Unknown ids are not an error.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        let before = self.state.meals.len();
        self.state.meals.retain(|m| m.id != id);
        let removed = self.state.meals.len() < before;
        self.persist()?;
        tracing::debug!("Remove {id}: removed={removed}");
        Ok(removed)
    }

    /// Drop every meal, keeping the goal. Returns how many were removed.
    pub fn clear(&mut self) -> Result<usize> {
        let count = self.state.meals.len();
        self.state.meals.clear();
        self.persist()?;
        tracing::debug!("Cleared {count} meal(s)");
        Ok(count)
    }

    /// Set the daily goal, substituting the default for non-positive values.
    pub fn set_goal(&mut self, value: i64) -> Result<i64> {
        self.state.goal = normalize_goal(value);
        self.persist()?;
        Ok(self.state.goal)
    }

    /// Replace the whole state with an already validated one.
    pub fn replace_all(&mut self, new_state: TrackerState) -> Result<()> {
        self.state = TrackerState {
            goal: normalize_goal(new_state.goal),
            meals: new_state.meals,
        };
        self.persist()?;
        tracing::debug!("Replaced state with {} meal(s)", self.state.meals.len());
        Ok(())
    }

    /// Decode a document and replace the state with it. A refused document
    /// leaves the current state untouched.
    pub fn import(&mut self, text: &str) -> Result<ImportOutcome> {
        match decode_document(text) {
            Ok(state) => {
                let meals = state.meals.len();
                self.replace_all(state)?;
                Ok(ImportOutcome::Replaced { meals })
            }
            Err(e) => {
                tracing::debug!("Import rejected: {e}");
                Ok(ImportOutcome::Refused(e))
            }
        }
    }
}

/// Result of [`Tracker::import`]. Store failures are reported separately
/// through the outer `Result`.
#[derive(Debug)]
pub enum ImportOutcome {
    Replaced { meals: usize },
    Refused(DecodeError),
}
