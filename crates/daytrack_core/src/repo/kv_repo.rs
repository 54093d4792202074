//! Key-value repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable blob read/write/delete APIs over the `kv_entries` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `delete_blobs` removes all requested keys in one statement, so bulk
//!   deletes are atomic from the caller's point of view.
//! - Construction is guarded: an unmigrated connection is rejected instead of
//!   failing later mid-operation.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::InputError;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

const KV_TABLE: &str = "kv_entries";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for tracker persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(InputError),
    Db(DbError),
    Encode {
        key: &'static str,
        source: serde_json::Error,
    },
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode { key, source } => {
                write!(f, "failed to encode blob for key `{key}`: {source}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection has schema version {actual_version}, expected {expected_version}; \
                 open it through `db::open_db` first"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Encode { source, .. } => Some(source),
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<InputError> for RepoError {
    fn from(value: InputError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for persisted key-value blobs.
pub trait KvRepository {
    /// Reads the blob stored under `key`, or `None` when the key is absent.
    fn read_blob(&self, key: &str) -> RepoResult<Option<String>>;
    /// Writes `value` under `key`, replacing any previous blob.
    fn write_blob(&self, key: &str, value: &str) -> RepoResult<()>;
    /// Removes every listed key in a single atomic statement.
    fn delete_blobs(&self, keys: &[&str]) -> RepoResult<()>;
}

/// SQLite-backed key-value repository.
pub struct SqliteKvRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvRepository<'conn> {
    /// Wraps a migrated connection after verifying its schema.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `PRAGMA user_version` is still 0.
    /// - `MissingRequiredTable` when `kv_entries` does not exist.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version == 0 {
            return Err(RepoError::UninitializedConnection {
                expected_version: latest_version(),
                actual_version,
            });
        }

        let table_exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [KV_TABLE],
            |row| row.get(0),
        )?;
        if table_exists == 0 {
            return Err(RepoError::MissingRequiredTable(KV_TABLE));
        }

        Ok(Self { conn })
    }
}

impl KvRepository for SqliteKvRepository<'_> {
    fn read_blob(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv_entries WHERE key = ?1;", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn write_blob(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now'))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete_blobs(&self, keys: &[&str]) -> RepoResult<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let placeholders = vec!["?"; keys.len()].join(", ");
        let sql = format!("DELETE FROM kv_entries WHERE key IN ({placeholders});");
        self.conn.execute(&sql, params_from_iter(keys.iter()))?;
        Ok(())
    }
}
