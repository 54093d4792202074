use chrono::{NaiveDate, TimeZone, Utc};
use daytrack_core::db::open_db_in_memory;
use daytrack_core::{
    InputError, RepoError, SqliteKvRepository, TrackerStore, DAILY_FOOD_ENTRIES_KEY,
};
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
fn added_entries_are_listed_in_append_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();
    let mut store = TrackerStore::load(repo).unwrap();

    let lunch = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
    let breakfast = Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap();
    store.add_food_entry("Chicken Salad", lunch).unwrap();
    store.add_food_entry("Oatmeal", breakfast).unwrap();

    let entries = store.food_entries_for_date(day(2024, 1, 10));
    assert_eq!(entries.len(), 2);
    // Append order, not timestamp order; display layers sort by timestamp.
    assert_eq!(entries[0].name, "Chicken Salad");
    assert_eq!(entries[1].name, "Oatmeal");
}

#[test]
fn time_of_day_never_splits_a_day() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();
    let mut store = TrackerStore::load(repo).unwrap();

    let early = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 1).unwrap();
    let late = Utc.with_ymd_and_hms(2024, 1, 10, 23, 59, 59).unwrap();
    store.add_food_entry("coffee", early).unwrap();
    store.add_food_entry("tea", late).unwrap();

    assert_eq!(store.food_entries_for_date(day(2024, 1, 10)).len(), 2);
    assert!(store.food_entries_for_date(day(2024, 1, 11)).is_empty());
}

#[test]
fn blank_name_is_rejected_and_nothing_changes() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();
    let mut store = TrackerStore::load(repo).unwrap();

    let at = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
    let err = store.add_food_entry("   ", at).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(InputError::EmptyFoodName)
    ));

    assert!(store.food_entries_for_date(day(2024, 1, 10)).is_empty());
    assert_eq!(read_blob(&conn, DAILY_FOOD_ENTRIES_KEY), None);
}

#[test]
fn deleting_an_unknown_id_is_a_successful_noop() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();
    let mut store = TrackerStore::load(repo).unwrap();

    let at = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
    store.add_food_entry("Chicken Salad", at).unwrap();

    store.delete_food_entry(uuid::Uuid::new_v4()).unwrap();
    assert_eq!(store.food_entries_for_date(day(2024, 1, 10)).len(), 1);
}

#[test]
fn deleting_one_entry_leaves_the_rest_of_the_day() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();
    let mut store = TrackerStore::load(repo).unwrap();

    let at = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
    let first = store.add_food_entry("Chicken Salad", at).unwrap();
    store.add_food_entry("Apple", at).unwrap();

    store.delete_food_entry(first).unwrap();

    let entries = store.food_entries_for_date(day(2024, 1, 10));
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "Apple");
}

#[test]
fn deleting_the_last_entry_removes_the_day_from_the_persisted_map() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();
    let mut store = TrackerStore::load(repo).unwrap();

    let kept = Utc.with_ymd_and_hms(2024, 1, 9, 18, 0, 0).unwrap();
    let removed = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
    store.add_food_entry("Soup", kept).unwrap();
    let id = store.add_food_entry("Chicken Salad", removed).unwrap();

    store.delete_food_entry(id).unwrap();

    let blob = read_blob(&conn, DAILY_FOOD_ENTRIES_KEY).expect("blob should exist");
    let map: serde_json::Value = serde_json::from_str(&blob).unwrap();
    let object = map.as_object().unwrap();
    assert!(object.contains_key("2024-01-09"));
    assert!(!object.contains_key("2024-01-10"));
}

#[test]
fn persisted_entries_use_epoch_second_timestamps() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();
    let mut store = TrackerStore::load(repo).unwrap();

    let at = Utc.with_ymd_and_hms(2024, 1, 10, 12, 30, 0).unwrap();
    let id = store.add_food_entry("Chicken Salad", at).unwrap();

    let blob = read_blob(&conn, DAILY_FOOD_ENTRIES_KEY).expect("blob should exist");
    let map: serde_json::Value = serde_json::from_str(&blob).unwrap();
    let entry = &map["2024-01-10"][0];
    assert_eq!(entry["id"], serde_json::json!(id.to_string()));
    assert_eq!(entry["name"], serde_json::json!("Chicken Salad"));
    assert_eq!(entry["timestamp"], serde_json::json!(at.timestamp()));
}
