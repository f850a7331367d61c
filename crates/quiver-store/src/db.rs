// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and the
//! snapshot table schema.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Stores clone one [`Database`] handle; do not open additional
//! connections for writes.

use quiver_core::QuiverError;
use tracing::debug;

/// One persisted snapshot row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRow {
    pub version: u32,
    pub payload: String,
}

/// Handle to the SQLite database backing every store snapshot.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path` and apply the schema.
    pub async fn open(path: &str) -> Result<Self, QuiverError> {
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| map_tr_err(e.into()))?;
        let db = Self { conn };
        db.init().await?;
        debug!(path, "database opened");
        Ok(db)
    }

    /// Open an in-memory database. Used by tests.
    pub async fn open_in_memory() -> Result<Self, QuiverError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| map_tr_err(e.into()))?;
        let db = Self { conn };
        db.init().await?;
        Ok(db)
    }

    async fn init(&self) -> Result<(), QuiverError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.pragma_update(None, "journal_mode", "WAL")?;
                conn.pragma_update(None, "synchronous", "NORMAL")?;
                conn.execute_batch(
                    "CREATE TABLE IF NOT EXISTS store_snapshots (
                        store TEXT PRIMARY KEY NOT NULL,
                        version INTEGER NOT NULL,
                        payload TEXT NOT NULL,
                        updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
                    );",
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    /// Read the persisted snapshot for a store, if any.
    pub async fn load_snapshot(&self, store: &str) -> Result<Option<SnapshotRow>, QuiverError> {
        let store = store.to_string();
        self.conn
            .call(move |conn| -> Result<Option<SnapshotRow>, rusqlite::Error> {
                let mut stmt = conn.prepare(
                    "SELECT version, payload FROM store_snapshots WHERE store = ?1",
                )?;
                let row = stmt
                    .query_row(rusqlite::params![store], |row| {
                        Ok(SnapshotRow {
                            version: row.get(0)?,
                            payload: row.get(1)?,
                        })
                    })
                    .map(Some)
                    .or_else(|err| match err {
                        rusqlite::Error::QueryReturnedNoRows => Ok(None),
                        other => Err(other),
                    })?;
                Ok(row)
            })
            .await
            .map_err(map_tr_err)
    }

    /// Upsert the snapshot for a store.
    pub async fn save_snapshot(
        &self,
        store: &str,
        version: u32,
        payload: String,
    ) -> Result<(), QuiverError> {
        let store = store.to_string();
        let updated_at = chrono::Utc::now()
            .format("%Y-%m-%dT%H:%M:%S%.3fZ")
            .to_string();
        self.conn
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT OR REPLACE INTO store_snapshots (store, version, payload, updated_at) \
                     VALUES (?1, ?2, ?3, ?4)",
                    rusqlite::params![store, version, payload, updated_at],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    /// Returns a reference to the underlying database connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }
}

/// Convert tokio-rusqlite errors to QuiverError::Storage.
fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> QuiverError {
    QuiverError::Storage {
        source: Box::new(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn snapshot_round_trip_and_upsert() {
        let db = Database::open_in_memory().await.unwrap();

        assert!(db.load_snapshot("user").await.unwrap().is_none());

        db.save_snapshot("user", 1, r#"{"a":1}"#.to_string())
            .await
            .unwrap();
        let row = db.load_snapshot("user").await.unwrap().unwrap();
        assert_eq!(row.version, 1);
        assert_eq!(row.payload, r#"{"a":1}"#);

        // Second write replaces the first.
        db.save_snapshot("user", 2, r#"{"a":2}"#.to_string())
            .await
            .unwrap();
        let row = db.load_snapshot("user").await.unwrap().unwrap();
        assert_eq!(row.version, 2);
        assert_eq!(row.payload, r#"{"a":2}"#);
    }

    #[tokio::test]
    async fn stores_are_scoped_by_name() {
        let db = Database::open_in_memory().await.unwrap();
        db.save_snapshot("coins", 1, "{}".to_string()).await.unwrap();
        assert!(db.load_snapshot("signals").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reopen_from_disk_keeps_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quiver-test.db");
        let path = path.to_str().unwrap();

        {
            let db = Database::open(path).await.unwrap();
            db.save_snapshot("cpa", 1, r#"{"x":true}"#.to_string())
                .await
                .unwrap();
        }

        let db = Database::open(path).await.unwrap();
        let row = db.load_snapshot("cpa").await.unwrap().unwrap();
        assert_eq!(row.payload, r#"{"x":true}"#);
    }
}
