//! Month grid construction for the calendar screen.
//!
//! # Responsibility
//! - Produce the week-aligned sequence of cell dates for a month view.
//! - Provide the companion predicates the grid cells render from.
//!
//! # Invariants
//! - Weeks start on Sunday.
//! - `month_grid` output is ascending, gap-free, and a multiple of 7 long.
//! - Everything here is a pure function of its inputs (plus the wall clock for
//!   `is_today`); no storage access.

use chrono::{Datelike, Duration, Local, Months, NaiveDate};

/// Builds the ordered cell dates covering the month of `reference`.
///
/// The month is padded backward to the Sunday on or before its first day and
/// forward to the Saturday on or after its last day, so the result always
/// fills whole week rows.
pub fn month_grid(reference: NaiveDate) -> Vec<NaiveDate> {
    let first = first_of_month(reference);
    let last = last_of_month(reference);

    let start = first - Duration::days(i64::from(first.weekday().num_days_from_sunday()));
    let end = last + Duration::days(i64::from(6 - last.weekday().num_days_from_sunday()));

    start.iter_days().take_while(|day| *day <= end).collect()
}

/// Whether `date` belongs to the month the grid is displaying.
///
/// Padding cells from adjacent months render dimmed and ignore taps.
pub fn is_in_displayed_month(date: NaiveDate, reference: NaiveDate) -> bool {
    date.year() == reference.year() && date.month() == reference.month()
}

/// Whether `date` is the local calendar day right now.
pub fn is_today(date: NaiveDate) -> bool {
    date == Local::now().date_naive()
}

/// The reference date shifted one month back; unchanged on overflow.
pub fn previous_month(reference: NaiveDate) -> NaiveDate {
    reference
        .checked_sub_months(Months::new(1))
        .unwrap_or(reference)
}

/// The reference date shifted one month forward; unchanged on overflow.
pub fn next_month(reference: NaiveDate) -> NaiveDate {
    reference
        .checked_add_months(Months::new(1))
        .unwrap_or(reference)
}

/// Heading text for the month view, e.g. `January 2024`.
pub fn month_title(reference: NaiveDate) -> String {
    reference.format("%B %Y").to_string()
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

fn last_of_month(date: NaiveDate) -> NaiveDate {
    // Day 1 plus 32 days always lands inside the following month.
    let into_next = first_of_month(date) + Duration::days(32);
    first_of_month(into_next) - Duration::days(1)
}

#[cfg(test)]
mod tests {
    use super::{first_of_month, last_of_month, month_title, next_month, previous_month};
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_bounds_cover_leap_february() {
        assert_eq!(first_of_month(day(2024, 2, 15)), day(2024, 2, 1));
        assert_eq!(last_of_month(day(2024, 2, 15)), day(2024, 2, 29));
        assert_eq!(last_of_month(day(2023, 2, 1)), day(2023, 2, 28));
    }

    #[test]
    fn month_bounds_cover_december() {
        assert_eq!(first_of_month(day(2024, 12, 31)), day(2024, 12, 1));
        assert_eq!(last_of_month(day(2024, 12, 1)), day(2024, 12, 31));
    }

    #[test]
    fn month_navigation_clamps_to_shorter_months() {
        assert_eq!(next_month(day(2024, 1, 31)), day(2024, 2, 29));
        assert_eq!(previous_month(day(2024, 3, 31)), day(2024, 2, 29));
        assert_eq!(next_month(day(2024, 12, 15)), day(2025, 1, 15));
    }

    #[test]
    fn month_title_formats_full_name_and_year() {
        assert_eq!(month_title(day(2024, 1, 10)), "January 2024");
    }
}
