//! Tracker store: the single owner of all persisted tracker state.
//!
//! # Responsibility
//! - Hold the four tracker collections in memory and answer queries from them.
//! - Mirror each collection to its own persisted blob after every mutation.
//!
//! # Invariants
//! - Loading is fail open per collection: one corrupt blob never takes down
//!   the other three.
//! - A mutation writes only the collection it touched.
//! - `clear_all` removes all four keys in one statement; no partial-clear
//!   state is observable.

use crate::model::food::{FoodEntry, FoodEntryId};
use crate::model::weight::WeightPoint;
use crate::repo::collection::{load_collection, save_collection};
use crate::repo::kv_repo::{KvRepository, RepoResult};
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, info};
use std::collections::{BTreeMap, BTreeSet};

/// Stable key for the initial weight scalar.
pub const INITIAL_WEIGHT_KEY: &str = "InitialWeight";
/// Stable key for the set of completed day keys.
pub const COMPLETED_DAYS_KEY: &str = "CompletedDays";
/// Stable key for the day -> weight map.
pub const DAILY_WEIGHTS_KEY: &str = "DailyWeights";
/// Stable key for the day -> food entry list map.
pub const DAILY_FOOD_ENTRIES_KEY: &str = "DailyFoodEntries";

/// In-memory tracker state backed by a key-value repository.
///
/// Constructed with [`TrackerStore::load`]; every mutating method persists the
/// affected collection before returning. One instance per process is expected,
/// owned by whatever drives the presentation layer.
pub struct TrackerStore<R: KvRepository> {
    repo: R,
    initial_weight: Option<f64>,
    daily_weights: BTreeMap<NaiveDate, f64>,
    food_entries: BTreeMap<NaiveDate, Vec<FoodEntry>>,
    completed_days: BTreeSet<NaiveDate>,
}

impl<R: KvRepository> TrackerStore<R> {
    /// Loads all four collections from the repository.
    ///
    /// Missing or malformed blobs load as empty/absent; only transport errors
    /// propagate.
    pub fn load(repo: R) -> RepoResult<Self> {
        let initial_weight = load_collection(&repo, INITIAL_WEIGHT_KEY)?;
        let daily_weights: BTreeMap<NaiveDate, f64> = load_collection(&repo, DAILY_WEIGHTS_KEY)?;
        let food_entries: BTreeMap<NaiveDate, Vec<FoodEntry>> =
            load_collection(&repo, DAILY_FOOD_ENTRIES_KEY)?;
        let completed_days: BTreeSet<NaiveDate> = load_collection(&repo, COMPLETED_DAYS_KEY)?;

        debug!(
            "event=store_load module=service status=ok weights={} food_days={} completed={}",
            daily_weights.len(),
            food_entries.len(),
            completed_days.len()
        );

        Ok(Self {
            repo,
            initial_weight,
            daily_weights,
            food_entries,
            completed_days,
        })
    }

    /// Returns the baseline weight, if one has been set.
    pub fn initial_weight(&self) -> Option<f64> {
        self.initial_weight
    }

    /// Replaces the baseline weight and persists it.
    ///
    /// The store accepts any real number here; text-field validation happens
    /// in [`crate::model::weight::parse_weight_input`] before this call.
    pub fn set_initial_weight(&mut self, value: f64) -> RepoResult<()> {
        self.initial_weight = Some(value);
        save_collection(&self.repo, INITIAL_WEIGHT_KEY, &value)
    }

    /// Upserts the weight recorded for `date`. Last write wins.
    pub fn record_weight(&mut self, date: NaiveDate, value: f64) -> RepoResult<()> {
        self.daily_weights.insert(date, value);
        save_collection(&self.repo, DAILY_WEIGHTS_KEY, &self.daily_weights)
    }

    /// Returns the weight recorded for `date`, if any.
    pub fn weight_for_date(&self, date: NaiveDate) -> Option<f64> {
        self.daily_weights.get(&date).copied()
    }

    /// The recorded weight series, ascending by date, one point per day.
    pub fn sorted_weight_series(&self) -> Vec<WeightPoint> {
        self.daily_weights
            .iter()
            .map(|(date, weight)| WeightPoint {
                date: *date,
                weight: *weight,
            })
            .collect()
    }

    /// The chart series: the recorded series, prefixed with a synthetic
    /// baseline point one day before the first record when an initial weight
    /// is set.
    ///
    /// The baseline shows the starting weight on the chart without polluting
    /// the stored series.
    pub fn chart_series(&self) -> Vec<WeightPoint> {
        let mut series = self.sorted_weight_series();

        if let (Some(initial), Some(first)) = (self.initial_weight, series.first().copied()) {
            if let Some(baseline_date) = first.date.pred_opt() {
                series.insert(
                    0,
                    WeightPoint {
                        date: baseline_date,
                        weight: initial,
                    },
                );
            }
        }

        series
    }

    /// The most recently dated weight record.
    pub fn latest_weight(&self) -> Option<f64> {
        self.daily_weights.last_key_value().map(|(_, weight)| *weight)
    }

    /// Net change from the baseline: `latest - initial`, when both exist.
    pub fn weight_change(&self) -> Option<f64> {
        match (self.initial_weight, self.latest_weight()) {
            (Some(initial), Some(latest)) => Some(latest - initial),
            _ => None,
        }
    }

    /// Appends a food entry under the day of `timestamp` and persists.
    ///
    /// # Errors
    /// - `RepoError::Validation` when `name` trims to nothing; the store is
    ///   left unchanged.
    pub fn add_food_entry(
        &mut self,
        name: &str,
        timestamp: DateTime<Utc>,
    ) -> RepoResult<FoodEntryId> {
        let entry = FoodEntry::new(name, timestamp)?;
        let id = entry.id;

        self.food_entries.entry(entry.day()).or_default().push(entry);
        save_collection(&self.repo, DAILY_FOOD_ENTRIES_KEY, &self.food_entries)?;
        Ok(id)
    }

    /// Entries logged for `date`, in append order.
    ///
    /// Display layers sort by timestamp; the store guarantees nothing beyond
    /// append order.
    pub fn food_entries_for_date(&self, date: NaiveDate) -> &[FoodEntry] {
        self.food_entries
            .get(&date)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Removes the entry with `id`, dropping its day from the map when the
    /// list becomes empty. Unknown ids are a successful no-op and nothing is
    /// written.
    pub fn delete_food_entry(&mut self, id: FoodEntryId) -> RepoResult<()> {
        let mut removed_from = None;
        for (day, entries) in &mut self.food_entries {
            if let Some(index) = entries.iter().position(|entry| entry.id == id) {
                entries.remove(index);
                removed_from = Some((*day, entries.is_empty()));
                break;
            }
        }

        let Some((day, now_empty)) = removed_from else {
            return Ok(());
        };
        if now_empty {
            self.food_entries.remove(&day);
        }
        save_collection(&self.repo, DAILY_FOOD_ENTRIES_KEY, &self.food_entries)
    }

    /// Flips completion for `date`, persists, and returns the new state.
    pub fn toggle_completion(&mut self, date: NaiveDate) -> RepoResult<bool> {
        let completed = if self.completed_days.remove(&date) {
            false
        } else {
            self.completed_days.insert(date);
            true
        };
        save_collection(&self.repo, COMPLETED_DAYS_KEY, &self.completed_days)?;
        Ok(completed)
    }

    /// Whether `date` is marked completed.
    pub fn is_completed(&self, date: NaiveDate) -> bool {
        self.completed_days.contains(&date)
    }

    /// Deletes all four persisted keys atomically, then resets memory.
    ///
    /// The only bulk delete the store offers.
    pub fn clear_all(&mut self) -> RepoResult<()> {
        self.repo.delete_blobs(&[
            INITIAL_WEIGHT_KEY,
            DAILY_WEIGHTS_KEY,
            DAILY_FOOD_ENTRIES_KEY,
            COMPLETED_DAYS_KEY,
        ])?;

        self.initial_weight = None;
        self.daily_weights.clear();
        self.food_entries.clear();
        self.completed_days.clear();

        info!("event=store_clear module=service status=ok");
        Ok(())
    }
}
