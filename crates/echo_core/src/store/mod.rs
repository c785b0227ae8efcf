//! Namespaced key/value store boundary.
//!
//! # Responsibility
//! - Define the persistence contract used by the entry repository.
//! - Layer JSON serialization helpers over raw string values.
//!
//! # Invariants
//! - Implementations namespace every key under [`KEY_NAMESPACE`] so unrelated
//!   data sharing the same database cannot collide.
//! - Callers pass logical keys (`entries`, `llm.model`); the prefix is an
//!   implementation detail of the adapter.

use crate::db::DbError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod sqlite;

pub use sqlite::SqliteKvStore;

/// Fixed prefix applied to every stored key.
pub const KEY_NAMESPACE: &str = "echo.";

pub type KvResult<T> = Result<T, KvError>;

/// Storage-layer error for key/value reads and writes.
#[derive(Debug)]
pub enum KvError {
    /// Underlying database failure.
    Db(DbError),
    /// Stored value could not be decoded into the requested type.
    Decode { key: String, message: String },
    /// Value could not be encoded for storage.
    Encode { key: String, message: String },
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Decode { key, message } => {
                write!(f, "failed to decode stored value for `{key}`: {message}")
            }
            Self::Encode { key, message } => {
                write!(f, "failed to encode value for `{key}`: {message}")
            }
        }
    }
}

impl Error for KvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Decode { .. } | Self::Encode { .. } => None,
        }
    }
}

impl From<DbError> for KvError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for KvError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistent string-keyed store with best-effort semantics.
///
/// The contract mirrors browser-style local storage: `get` returns the stored
/// value or absent, `set` overwrites unconditionally, `remove` is idempotent.
pub trait KvStore {
    /// Returns the stored value for `key`, or `None` when absent.
    fn get(&self, key: &str) -> KvResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> KvResult<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> KvResult<()>;

    /// Reads and JSON-decodes the value stored under `key`.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> KvResult<Option<T>> {
        match self.get(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|err| KvError::Decode {
                    key: key.to_string(),
                    message: err.to_string(),
                }),
            None => Ok(None),
        }
    }

    /// JSON-encodes `value` and stores it under `key`.
    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> KvResult<()> {
        let raw = serde_json::to_string(value).map_err(|err| KvError::Encode {
            key: key.to_string(),
            message: err.to_string(),
        })?;
        self.set(key, &raw)
    }
}

/// Maps a logical key to its namespaced storage key.
pub(crate) fn storage_key(key: &str) -> String {
    format!("{KEY_NAMESPACE}{key}")
}
