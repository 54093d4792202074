//! Core domain logic for DayTrack.
//! This crate is the single source of truth for tracker business invariants.

pub mod calendar;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::date_key::{date_key, parse_date_key, DATE_KEY_FORMAT};
pub use model::food::{FoodEntry, FoodEntryId};
pub use model::weight::{parse_weight_input, WeightPoint};
pub use model::InputError;
pub use repo::kv_repo::{KvRepository, RepoError, RepoResult, SqliteKvRepository};
pub use service::tracker_store::{
    TrackerStore, COMPLETED_DAYS_KEY, DAILY_FOOD_ENTRIES_KEY, DAILY_WEIGHTS_KEY,
    INITIAL_WEIGHT_KEY,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
