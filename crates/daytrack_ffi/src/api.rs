//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level tracker functions to Dart via FRB.
//! - Keep error semantics simple for the UI: envelopes and empty fallbacks.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Date parameters and results use the normalized `YYYY-MM-DD` key form.

use chrono::{DateTime, Datelike, Local, Utc};
use daytrack_core::db::open_db;
use daytrack_core::{
    calendar, core_version as core_version_inner, date_key, init_logging as init_logging_inner,
    parse_date_key, parse_weight_input, ping as ping_inner, FoodEntryId, SqliteKvRepository,
    TrackerStore,
};
use log::error;
use std::path::PathBuf;
use std::sync::OnceLock;

const TRACKER_DB_FILE_NAME: &str = "daytrack.sqlite3";
static TRACKER_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One cell of the month grid, precomputed for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    /// Normalized `YYYY-MM-DD` key for this cell.
    pub date_key: String,
    /// Day-of-month number shown in the cell.
    pub day_of_month: u32,
    /// False for the dimmed padding cells from adjacent months.
    pub in_displayed_month: bool,
    /// Whether this cell is the local calendar day right now.
    pub today: bool,
    /// Whether the user marked this day completed.
    pub completed: bool,
}

/// One point of the weight progress chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub date_key: String,
    pub weight: f64,
}

/// One row of the food log list, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodEntryItem {
    /// Stable entry id in string form; pass back to `delete_food_entry`.
    pub id: String,
    pub name: String,
    /// Epoch seconds.
    pub timestamp_secs: i64,
}

/// Generic action response envelope for tracker command flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Response envelope for `add_food_entry`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddFoodResponse {
    /// Whether the entry was created.
    pub ok: bool,
    /// Created entry id on success.
    pub entry_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

/// Response envelope for `toggle_completion`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleResponse {
    /// Whether the toggle was persisted.
    pub ok: bool,
    /// New membership state after the toggle.
    pub completed: bool,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

/// Builds the month grid cells for the month containing `reference_key`.
///
/// # FFI contract
/// - Sync call, DB-backed execution (completion flags).
/// - Never panics; unparsable keys and storage failures yield an empty list.
#[flutter_rust_bridge::frb(sync)]
pub fn month_cells(reference_key: String) -> Vec<DayCell> {
    let Some(reference) = parse_date_key(&reference_key) else {
        return Vec::new();
    };

    match with_store(|store| {
        Ok(calendar::month_grid(reference)
            .into_iter()
            .map(|day| DayCell {
                date_key: date_key(day),
                day_of_month: day.day(),
                in_displayed_month: calendar::is_in_displayed_month(day, reference),
                today: calendar::is_today(day),
                completed: store.is_completed(day),
            })
            .collect())
    }) {
        Ok(cells) => cells,
        Err(message) => {
            error!("event=month_cells module=ffi status=error error={message}");
            Vec::new()
        }
    }
}

/// Heading text for the month containing `reference_key`, e.g. `January 2024`.
///
/// # FFI contract
/// - Sync call, pure computation.
/// - Unparsable keys yield an empty string.
#[flutter_rust_bridge::frb(sync)]
pub fn month_title(reference_key: String) -> String {
    parse_date_key(&reference_key)
        .map(calendar::month_title)
        .unwrap_or_default()
}

/// Shifts `reference_key` one month back; unchanged when unparsable.
#[flutter_rust_bridge::frb(sync)]
pub fn previous_month_key(reference_key: String) -> String {
    match parse_date_key(&reference_key) {
        Some(reference) => date_key(calendar::previous_month(reference)),
        None => reference_key,
    }
}

/// Shifts `reference_key` one month forward; unchanged when unparsable.
#[flutter_rust_bridge::frb(sync)]
pub fn next_month_key(reference_key: String) -> String {
    match parse_date_key(&reference_key) {
        Some(reference) => date_key(calendar::next_month(reference)),
        None => reference_key,
    }
}

/// The local calendar day right now, as a date key.
#[flutter_rust_bridge::frb(sync)]
pub fn today_key() -> String {
    date_key(Local::now().date_naive())
}

/// Sets the baseline weight from raw text-field input.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; invalid input returns a user-showable failure message.
#[flutter_rust_bridge::frb(sync)]
pub fn set_initial_weight(weight_input: String) -> ActionResponse {
    let value = match parse_weight_input(&weight_input) {
        Ok(value) => value,
        Err(err) => return ActionResponse::failure(err.to_string()),
    };

    match with_store(|store| store.set_initial_weight(value)) {
        Ok(()) => ActionResponse::success("Weight saved."),
        Err(message) => ActionResponse::failure(format!("set_initial_weight failed: {message}")),
    }
}

/// Returns the baseline weight, if one has been set.
#[flutter_rust_bridge::frb(sync)]
pub fn initial_weight() -> Option<f64> {
    read_or_none("initial_weight", |store| store.initial_weight())
}

/// Records a weight for a day, from raw text-field input.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; invalid date keys or weight text return a failure message.
#[flutter_rust_bridge::frb(sync)]
pub fn record_weight(date_key_input: String, weight_input: String) -> ActionResponse {
    let Some(date) = parse_date_key(&date_key_input) else {
        return ActionResponse::failure(format!("`{date_key_input}` is not a valid date"));
    };
    let value = match parse_weight_input(&weight_input) {
        Ok(value) => value,
        Err(err) => return ActionResponse::failure(err.to_string()),
    };

    match with_store(|store| store.record_weight(date, value)) {
        Ok(()) => ActionResponse::success("Weight entry saved."),
        Err(message) => ActionResponse::failure(format!("record_weight failed: {message}")),
    }
}

/// Returns the weight recorded for a day, if any.
#[flutter_rust_bridge::frb(sync)]
pub fn weight_for_date(date_key_input: String) -> Option<f64> {
    let date = parse_date_key(&date_key_input)?;
    read_or_none("weight_for_date", move |store| store.weight_for_date(date))
}

/// The chart series: recorded weights ascending by day, prefixed with the
/// synthetic baseline point when an initial weight is set.
#[flutter_rust_bridge::frb(sync)]
pub fn chart_series() -> Vec<ChartPoint> {
    match with_store(|store| {
        Ok(store
            .chart_series()
            .into_iter()
            .map(|point| ChartPoint {
                date_key: date_key(point.date),
                weight: point.weight,
            })
            .collect())
    }) {
        Ok(points) => points,
        Err(message) => {
            error!("event=chart_series module=ffi status=error error={message}");
            Vec::new()
        }
    }
}

/// The most recently dated weight record.
#[flutter_rust_bridge::frb(sync)]
pub fn latest_weight() -> Option<f64> {
    read_or_none("latest_weight", |store| store.latest_weight())
}

/// Net change from the baseline (`latest - initial`), when both exist.
#[flutter_rust_bridge::frb(sync)]
pub fn weight_change() -> Option<f64> {
    read_or_none("weight_change", |store| store.weight_change())
}

/// Adds a food entry for the day of `timestamp_secs`.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; empty names and invalid timestamps return failure messages.
#[flutter_rust_bridge::frb(sync)]
pub fn add_food_entry(name: String, timestamp_secs: i64) -> AddFoodResponse {
    let Some(timestamp) = DateTime::<Utc>::from_timestamp(timestamp_secs, 0) else {
        return AddFoodResponse {
            ok: false,
            entry_id: None,
            message: format!("`{timestamp_secs}` is not a valid timestamp"),
        };
    };

    match with_store(|store| store.add_food_entry(&name, timestamp)) {
        Ok(id) => AddFoodResponse {
            ok: true,
            entry_id: Some(id.to_string()),
            message: "Food entry added.".to_string(),
        },
        Err(message) => AddFoodResponse {
            ok: false,
            entry_id: None,
            message: format!("add_food_entry failed: {message}"),
        },
    }
}

/// Food entries for a day, sorted by timestamp ascending for display.
#[flutter_rust_bridge::frb(sync)]
pub fn food_entries_for_date(date_key_input: String) -> Vec<FoodEntryItem> {
    let Some(date) = parse_date_key(&date_key_input) else {
        return Vec::new();
    };

    match with_store(|store| {
        let mut items = store
            .food_entries_for_date(date)
            .iter()
            .map(|entry| FoodEntryItem {
                id: entry.id.to_string(),
                name: entry.name.clone(),
                timestamp_secs: entry.timestamp.timestamp(),
            })
            .collect::<Vec<_>>();
        items.sort_by_key(|item| item.timestamp_secs);
        Ok(items)
    }) {
        Ok(items) => items,
        Err(message) => {
            error!("event=food_entries module=ffi status=error error={message}");
            Vec::new()
        }
    }
}

/// Deletes one food entry by id. Unknown ids succeed as a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_food_entry(id: String) -> ActionResponse {
    let id = match id.parse::<FoodEntryId>() {
        Ok(id) => id,
        Err(_) => return ActionResponse::failure(format!("`{id}` is not a valid entry id")),
    };

    match with_store(|store| store.delete_food_entry(id)) {
        Ok(()) => ActionResponse::success("Food entry removed."),
        Err(message) => ActionResponse::failure(format!("delete_food_entry failed: {message}")),
    }
}

/// Flips completion for a day and returns the new state.
#[flutter_rust_bridge::frb(sync)]
pub fn toggle_completion(date_key_input: String) -> ToggleResponse {
    let Some(date) = parse_date_key(&date_key_input) else {
        return ToggleResponse {
            ok: false,
            completed: false,
            message: format!("`{date_key_input}` is not a valid date"),
        };
    };

    match with_store(|store| store.toggle_completion(date)) {
        Ok(completed) => ToggleResponse {
            ok: true,
            completed,
            message: if completed {
                "Day marked completed.".to_string()
            } else {
                "Day completion removed.".to_string()
            },
        },
        Err(message) => ToggleResponse {
            ok: false,
            completed: false,
            message: format!("toggle_completion failed: {message}"),
        },
    }
}

/// Whether a day is marked completed.
#[flutter_rust_bridge::frb(sync)]
pub fn is_completed(date_key_input: String) -> bool {
    let Some(date) = parse_date_key(&date_key_input) else {
        return false;
    };
    read_or_none("is_completed", move |store| Some(store.is_completed(date))).unwrap_or(false)
}

/// Clears all tracker data: weights, food entries, completions, baseline.
#[flutter_rust_bridge::frb(sync)]
pub fn clear_all() -> ActionResponse {
    match with_store(|store| store.clear_all()) {
        Ok(()) => ActionResponse::success("All tracker data cleared."),
        Err(message) => ActionResponse::failure(format!("clear_all failed: {message}")),
    }
}

fn resolve_tracker_db_path() -> PathBuf {
    TRACKER_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("DAYTRACK_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(TRACKER_DB_FILE_NAME)
        })
        .clone()
}

fn with_store<T>(
    f: impl FnOnce(&mut TrackerStore<SqliteKvRepository<'_>>) -> daytrack_core::RepoResult<T>,
) -> Result<T, String> {
    let db_path = resolve_tracker_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("tracker DB open failed: {err}"))?;
    let repo = SqliteKvRepository::try_new(&conn)
        .map_err(|err| format!("tracker repo init failed: {err}"))?;
    let mut store =
        TrackerStore::load(repo).map_err(|err| format!("tracker load failed: {err}"))?;
    f(&mut store).map_err(|err| err.to_string())
}

fn read_or_none<T>(
    op: &'static str,
    f: impl FnOnce(&mut TrackerStore<SqliteKvRepository<'_>>) -> Option<T>,
) -> Option<T> {
    match with_store(|store| Ok(f(store))) {
        Ok(value) => value,
        Err(message) => {
            error!("event={op} module=ffi status=error error={message}");
            None
        }
    }
}
