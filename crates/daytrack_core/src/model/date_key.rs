//! Date-key normalization helpers.
//!
//! # Responsibility
//! - Map calendar days to the stable `YYYY-MM-DD` string key used in persisted
//!   blobs and across the FFI boundary.
//! - Truncate timestamps to day granularity.
//!
//! # Invariants
//! - The same calendar day always normalizes to the same key, regardless of the
//!   time-of-day component of the source timestamp.

use chrono::{DateTime, NaiveDate, Utc};

/// Strftime pattern for the persisted day key.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Formats a day as its stable `YYYY-MM-DD` key.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parses a `YYYY-MM-DD` key back into a day.
///
/// Returns `None` for anything that is not a valid key, leaving the caller to
/// decide whether that is user error or stale data.
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), DATE_KEY_FORMAT).ok()
}

/// Truncates a timestamp to the day it falls on.
pub fn day_of(timestamp: DateTime<Utc>) -> NaiveDate {
    timestamp.date_naive()
}
