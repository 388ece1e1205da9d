// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and schema
//! initialization.
//!
//! All access is serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use std::path::Path;

use amiko_config::model::StorageConfig;
use amiko_core::AmikoError;
use tokio_rusqlite::Connection;
use tracing::info;

/// Schema applied at open. Idempotent.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS friends (
    id          TEXT PRIMARY KEY,
    owner_id    TEXT NOT NULL,
    name        TEXT NOT NULL,
    personality TEXT NOT NULL DEFAULT '[]',
    backstory   TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_friends_owner ON friends(owner_id);

CREATE TABLE IF NOT EXISTS messages (
    id          TEXT PRIMARY KEY,
    sender_id   TEXT NOT NULL,
    receiver_id TEXT NOT NULL,
    content     TEXT NOT NULL,
    from_ai     INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_messages_pair
    ON messages(sender_id, receiver_id, created_at);

CREATE TABLE IF NOT EXISTS memories (
    user_id      TEXT NOT NULL,
    friend_id    TEXT NOT NULL,
    blob         TEXT NOT NULL DEFAULT '{}',
    last_updated TEXT NOT NULL,
    PRIMARY KEY (user_id, friend_id)
);
";

/// Converts tokio-rusqlite errors into [`AmikoError::Storage`].
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> AmikoError {
    AmikoError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the SQLite database.
///
/// Cheap to clone; all clones share the single background connection.
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) the database at the configured path and applies
    /// PRAGMAs and schema.
    pub async fn open(config: &StorageConfig) -> Result<Self, AmikoError> {
        if let Some(parent) = Path::new(&config.database_path).parent() {
            std::fs::create_dir_all(parent).map_err(|e| AmikoError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = Connection::open(&config.database_path)
            .await
            .map_err(|e| map_tr_err(e.into()))?;

        let wal_mode = config.wal_mode;
        conn.call(move |conn| {
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")?;
            }
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        info!(path = config.database_path.as_str(), wal = wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// Opens an in-memory database with the schema applied. For tests.
    pub async fn open_in_memory() -> Result<Self, AmikoError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| map_tr_err(e.into()))?;
        conn.call(|conn| {
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;
        Ok(Self { conn })
    }

    /// Access the underlying connection for query modules and ad-hoc
    /// statements.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_creates_file_and_schema() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = StorageConfig {
            database_path: dir.path().join("amiko.db").to_string_lossy().to_string(),
            wal_mode: true,
        };

        let db = Database::open(&config).await.unwrap();
        let count: i64 = db
            .connection()
            .call(|conn| {
                let n = conn.query_row(
                    "SELECT count(*) FROM sqlite_master WHERE type = 'table'
                     AND name IN ('friends', 'messages', 'memories')",
                    [],
                    |row| row.get(0),
                )?;
                Ok::<_, rusqlite::Error>(n)
            })
            .await
            .unwrap();
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn open_is_idempotent() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = StorageConfig {
            database_path: dir.path().join("amiko.db").to_string_lossy().to_string(),
            wal_mode: false,
        };
        Database::open(&config).await.unwrap();
        Database::open(&config).await.unwrap();
    }
}
