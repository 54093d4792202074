use chrono::NaiveDate;
use daytrack_core::db::open_db_in_memory;
use daytrack_core::{SqliteKvRepository, TrackerStore, COMPLETED_DAYS_KEY};
use rusqlite::{Connection, OptionalExtension};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn read_blob(conn: &Connection, key: &str) -> Option<String> {
    conn.query_row("SELECT value FROM kv_entries WHERE key = ?1;", [key], |row| {
        row.get(0)
    })
    .optional()
    .unwrap()
}

#[test]
fn toggle_reports_and_flips_membership() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();
    let mut store = TrackerStore::load(repo).unwrap();

    assert!(!store.is_completed(day(2024, 1, 5)));
    assert!(store.toggle_completion(day(2024, 1, 5)).unwrap());
    assert!(store.is_completed(day(2024, 1, 5)));
    assert!(!store.toggle_completion(day(2024, 1, 5)).unwrap());
    assert!(!store.is_completed(day(2024, 1, 5)));
}

#[test]
fn toggling_one_day_does_not_touch_others() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();
    let mut store = TrackerStore::load(repo).unwrap();

    store.toggle_completion(day(2024, 1, 5)).unwrap();
    store.toggle_completion(day(2024, 2, 1)).unwrap();
    store.toggle_completion(day(2024, 1, 5)).unwrap();

    assert!(!store.is_completed(day(2024, 1, 5)));
    assert!(store.is_completed(day(2024, 2, 1)));
}

#[test]
fn completed_days_persist_as_an_array_of_date_keys() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();
    let mut store = TrackerStore::load(repo).unwrap();

    store.toggle_completion(day(2024, 2, 1)).unwrap();
    store.toggle_completion(day(2024, 1, 5)).unwrap();

    let blob = read_blob(&conn, COMPLETED_DAYS_KEY).expect("blob should exist");
    let parsed: Vec<String> = serde_json::from_str(&blob).unwrap();
    assert_eq!(parsed, vec!["2024-01-05", "2024-02-01"]);
}
