//! Food log entry model.
//!
//! # Responsibility
//! - Define the record appended to a day's food list.
//! - Enforce the non-empty-name rule at construction time.
//!
//! # Invariants
//! - `id` is stable and never reused for another entry.
//! - `name` is stored trimmed and is never empty.
//! - The entry's day key is derived from `timestamp`, never stored separately.

use crate::model::date_key::day_of;
use crate::model::InputError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a food log entry.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type FoodEntryId = Uuid;

/// One logged food item.
///
/// Several entries may share a day; ordering within a day is append order,
/// and display layers sort by `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodEntry {
    /// Stable global ID used for individual deletion.
    pub id: FoodEntryId,
    /// Trimmed, non-empty food name.
    pub name: String,
    /// Moment the item was eaten. Persisted as epoch seconds.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
}

impl FoodEntry {
    /// Creates an entry with a freshly generated stable ID.
    ///
    /// # Errors
    /// - `InputError::EmptyFoodName` when `name` trims to nothing; no entry is
    ///   constructed in that case.
    pub fn new(name: &str, timestamp: DateTime<Utc>) -> Result<Self, InputError> {
        Self::with_id(Uuid::new_v4(), name, timestamp)
    }

    /// Creates an entry with a caller-provided stable ID.
    ///
    /// Used by tests and import paths where identity already exists.
    pub fn with_id(
        id: FoodEntryId,
        name: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, InputError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(InputError::EmptyFoodName);
        }
        Ok(Self {
            id,
            name: trimmed.to_string(),
            timestamp,
        })
    }

    /// Returns the day this entry is filed under.
    pub fn day(&self) -> NaiveDate {
        day_of(self.timestamp)
    }
}
