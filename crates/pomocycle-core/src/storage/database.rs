//! SQLite-backed key-value store.
//!
//! Every persisted record (session snapshot, duration settings, per-user
//! history) is a JSON value under a single key in the `kv` table.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};

use super::data_dir;
use crate::error::DatabaseError;

/// SQLite database holding the `kv` table.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/pomocycle.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory or database cannot be opened.
    pub fn open() -> Result<Self, DatabaseError> {
        let path = data_dir()?.join("pomocycle.db");
        Self::open_at(&path)
    }

    /// Open (or create) a database file at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: PathBuf::from(path),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory().map_err(|source| DatabaseError::OpenFailed {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        Ok(get(&self.conn, key)?)
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        Ok(set(&self.conn, key, value)?)
    }

    /// Read-modify-write a single key inside one transaction.
    pub fn kv_update<F>(&self, key: &str, update: F) -> Result<(), DatabaseError>
    where
        F: FnOnce(Option<String>) -> Result<String, DatabaseError>,
    {
        let tx = self.conn.unchecked_transaction()?;
        let current = get(&tx, key)?;
        let next = update(current)?;
        set(&tx, key, &next)?;
        tx.commit()?;
        Ok(())
    }

    /// Keys starting with `prefix`, sorted.
    pub fn kv_keys(&self, prefix: &str) -> Result<Vec<String>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv WHERE substr(key, 1, length(?1)) = ?1 ORDER BY key")?;
        let keys = stmt
            .query_map(params![prefix], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }
}

fn get(conn: &Connection, key: &str) -> Result<Option<String>, rusqlite::Error> {
    conn.query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
        row.get::<_, String>(0)
    })
    .optional()
}

fn set(conn: &Connection, key: &str, value: &str) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
        params![key, value],
    )?;
    Ok(())
}
