// SQLite persistence layer for auction state.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::auction::Auction;

/// SQLite-backed persistence for auction snapshots. Each auction is stored
/// as a single JSON document keyed by its id, rewritten after every
/// mutating operation.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure the schema
    /// exists. Pass `":memory:"` for an ephemeral in-memory database
    /// (useful for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS auctions (
                id         TEXT PRIMARY KEY,
                name       TEXT NOT NULL,
                status     TEXT NOT NULL,
                data       TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    /// Write the full snapshot of an auction. Uses INSERT OR REPLACE so
    /// repeated saves overwrite the previous snapshot; the name and status
    /// columns are duplicated out of the JSON for ad-hoc inspection.
    pub fn save_auction(&self, auction: &Auction) -> Result<()> {
        let conn = self.conn();
        let data =
            serde_json::to_string(auction).context("failed to serialize auction snapshot")?;
        let status =
            serde_json::to_value(auction.status).context("failed to serialize auction status")?;
        conn.execute(
            "INSERT OR REPLACE INTO auctions (id, name, status, data, updated_at)
             VALUES (?1, ?2, ?3, ?4, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))",
            params![
                auction.id,
                auction.name,
                status.as_str().unwrap_or("unknown"),
                data,
            ],
        )
        .context("failed to save auction snapshot")?;
        Ok(())
    }

    /// Load one auction snapshot by id. Returns `None` if the id is not in
    /// the database.
    pub fn load_auction(&self, id: &str) -> Result<Option<Auction>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT data FROM auctions WHERE id = ?1")
            .context("failed to prepare load_auction query")?;

        let mut rows = stmt
            .query_map(params![id], |row| {
                let data: String = row.get(0)?;
                Ok(data)
            })
            .context("failed to query auction snapshot")?;

        match rows.next() {
            Some(row_result) => {
                let data = row_result.context("failed to read auction row")?;
                let auction: Auction = serde_json::from_str(&data)
                    .context("failed to deserialize auction snapshot")?;
                Ok(Some(auction))
            }
            None => Ok(None),
        }
    }

    /// Load every stored auction, ordered by id. Used for restart recovery.
    pub fn load_all(&self) -> Result<Vec<Auction>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT data FROM auctions ORDER BY id")
            .context("failed to prepare load_all query")?;

        let auctions = stmt
            .query_map([], |row| {
                let data: String = row.get(0)?;
                Ok(data)
            })
            .context("failed to query auction snapshots")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to read auction rows")?
            .iter()
            .map(|data| {
                serde_json::from_str::<Auction>(data)
                    .context("failed to deserialize auction snapshot")
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(auctions)
    }

    /// Delete one auction snapshot. Deleting an unknown id is a no-op.
    pub fn delete_auction(&self, id: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute("DELETE FROM auctions WHERE id = ?1", params![id])
            .context("failed to delete auction snapshot")?;
        Ok(())
    }
}
