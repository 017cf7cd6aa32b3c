//! Database module for persisting the hourly step state
//!
//! Uses SQLite as a durable key-value table. Each batch is written in a
//! single transaction with `synchronous = FULL`, so once a write returns the
//! record survives a process kill.

use crate::core::{Error, Result};
use crate::store::StateStore;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Database manager
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_schema()?;

        log::info!("Opened state database at {}", path.display());
        Ok(db)
    }

    /// Volatile database, used by the `memory` backend and tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            PRAGMA synchronous = FULL;

            CREATE TABLE IF NOT EXISTS hour_state (
                key TEXT PRIMARY KEY,
                value INTEGER NOT NULL
            );
            "#,
        )?;

        Ok(())
    }

    /// Number of stored keys
    pub fn key_count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM hour_state", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl StateStore for Database {
    fn read(&self, key: &str) -> Result<Option<i64>> {
        self.conn
            .query_row(
                "SELECT value FROM hour_state WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Error::Database)
    }

    fn write_batch(&mut self, entries: &[(&'static str, i64)]) -> Result<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                r#"INSERT INTO hour_state (key, value) VALUES (?1, ?2)
                   ON CONFLICT(key) DO UPDATE SET value = ?2"#,
            )?;
            for (key, value) in entries {
                stmt.execute(params![key, value])?;
            }
        }
        tx.commit()?;

        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.conn.execute("DELETE FROM hour_state", [])?;
        Ok(())
    }

    fn replace_all(&mut self, entries: &[(&'static str, i64)]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM hour_state", [])?;
        {
            let mut stmt =
                tx.prepare_cached("INSERT INTO hour_state (key, value) VALUES (?1, ?2)")?;
            for (key, value) in entries {
                stmt.execute(params![key, value])?;
            }
        }
        tx.commit()?;

        Ok(())
    }
}
