//! Generic load/save plumbing for one persisted collection.
//!
//! The tracker keeps several independent date-keyed collections that all
//! persist the same way: one JSON blob under one stable key. This module
//! factors that pattern once, generic over the serde value type, instead of
//! repeating it per collection.
//!
//! # Invariants
//! - A missing key loads as the collection's `Default` value, never an error.
//! - A present-but-malformed blob is logged and loads as `Default` (fail open,
//!   scoped to that one collection).
//! - Saves surface real errors; they never fail open.

use crate::repo::kv_repo::{KvRepository, RepoError, RepoResult};
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Loads the collection stored under `key`, falling back to `Default`.
pub fn load_collection<T>(repo: &impl KvRepository, key: &'static str) -> RepoResult<T>
where
    T: DeserializeOwned + Default,
{
    let Some(blob) = repo.read_blob(key)? else {
        return Ok(T::default());
    };

    match serde_json::from_str(&blob) {
        Ok(value) => Ok(value),
        Err(err) => {
            warn!("event=collection_load module=repo status=decode_failed key={key} error={err}");
            Ok(T::default())
        }
    }
}

/// Serializes the collection and writes it under `key`.
pub fn save_collection<T>(repo: &impl KvRepository, key: &'static str, value: &T) -> RepoResult<()>
where
    T: Serialize,
{
    let blob = serde_json::to_string(value).map_err(|source| RepoError::Encode { key, source })?;
    repo.write_blob(key, &blob)
}
