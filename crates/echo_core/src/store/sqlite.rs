//! SQLite-backed key/value store implementation.
//!
//! # Responsibility
//! - Persist namespaced string values in the `kv` table.
//! - Keep SQL details inside the store boundary.
//!
//! # Invariants
//! - Connections are fully migrated before the store accepts operations.
//! - Every row key carries the [`super::KEY_NAMESPACE`] prefix.

use super::{storage_key, KvResult, KvStore};
use crate::db::{open_db, open_db_in_memory};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Key/value store over a single SQLite `kv` table.
pub struct SqliteKvStore {
    conn: Connection,
}

impl SqliteKvStore {
    /// Opens (or creates) a store backed by the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> KvResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens a store backed by an in-memory database.
    ///
    /// Contents are lost when the store is dropped. Intended for tests and
    /// throwaway sessions.
    pub fn open_in_memory() -> KvResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Wraps an already-migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Borrows the underlying connection for maintenance queries.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KvStore for SqliteKvStore {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1;",
                params![storage_key(key)],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> KvResult<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
            params![storage_key(key), value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> KvResult<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1;", params![storage_key(key)])?;
        Ok(())
    }
}
