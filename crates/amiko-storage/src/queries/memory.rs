// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Long-lived memory blobs, one per (user, friend) pair.
//!
//! The blob is a flat JSON object. Patches merge shallowly: each top-level
//! key in the patch overwrites the stored key, other keys are kept.

use amiko_core::{AmikoError, MemoryBlob};
use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use serde_json::Value;

use crate::database::{map_tr_err, Database};

/// Loads the memory blob for a pair; absent rows read as an empty blob.
pub async fn load_memory(
    db: &Database,
    user_id: &str,
    friend_id: &str,
) -> Result<MemoryBlob, AmikoError> {
    let user_id = user_id.to_string();
    let friend_id = friend_id.to_string();
    db.connection()
        .call(move |conn| {
            let blob_json: Option<String> = conn
                .query_row(
                    "SELECT blob FROM memories WHERE user_id = ?1 AND friend_id = ?2",
                    params![user_id, friend_id],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(blob_json)
        })
        .await
        .map_err(map_tr_err)
        .map(|blob_json| {
            blob_json
                .and_then(|s| serde_json::from_str(&s).ok())
                .unwrap_or_default()
        })
}

/// Shallow-merges a patch into the pair's memory blob, creating the row if
/// needed. Sets `lastUpdated` to the current UTC time.
pub async fn apply_memory_patch(
    db: &Database,
    user_id: &str,
    friend_id: &str,
    patch: MemoryBlob,
) -> Result<(), AmikoError> {
    let user_id = user_id.to_string();
    let friend_id = friend_id.to_string();
    let now = Utc::now().to_rfc3339();

    db.connection()
        .call(move |conn| {
            let existing: Option<String> = conn
                .query_row(
                    "SELECT blob FROM memories WHERE user_id = ?1 AND friend_id = ?2",
                    params![user_id, friend_id],
                    |row| row.get(0),
                )
                .optional()?;

            let mut blob: MemoryBlob = existing
                .and_then(|s| serde_json::from_str(&s).ok())
                .unwrap_or_default();
            for (key, value) in patch {
                blob.insert(key, value);
            }
            blob.insert("lastUpdated".to_string(), Value::String(now.clone()));

            let blob_json = Value::Object(blob).to_string();

            conn.execute(
                "INSERT INTO memories (user_id, friend_id, blob, last_updated)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(user_id, friend_id)
                 DO UPDATE SET blob = excluded.blob, last_updated = excluded.last_updated",
                params![user_id, friend_id, blob_json, now],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patch(pairs: &[(&str, Value)]) -> MemoryBlob {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn absent_memory_reads_as_empty() {
        let db = Database::open_in_memory().await.unwrap();
        let blob = load_memory(&db, "u", "f").await.unwrap();
        assert!(blob.is_empty());
    }

    #[tokio::test]
    async fn patch_creates_row_and_stamps_last_updated() {
        let db = Database::open_in_memory().await.unwrap();
        apply_memory_patch(&db, "u", "f", patch(&[("latestSnippet", json!("hi"))]))
            .await
            .unwrap();

        let blob = load_memory(&db, "u", "f").await.unwrap();
        assert_eq!(blob.get("latestSnippet"), Some(&json!("hi")));
        assert!(blob.contains_key("lastUpdated"));
    }

    #[tokio::test]
    async fn merge_is_shallow() {
        let db = Database::open_in_memory().await.unwrap();
        apply_memory_patch(
            &db,
            "u",
            "f",
            patch(&[("mood", json!("calm")), ("topic", json!("music"))]),
        )
        .await
        .unwrap();
        apply_memory_patch(&db, "u", "f", patch(&[("mood", json!("excited"))]))
            .await
            .unwrap();

        let blob = load_memory(&db, "u", "f").await.unwrap();
        assert_eq!(blob.get("mood"), Some(&json!("excited")));
        assert_eq!(blob.get("topic"), Some(&json!("music")));
    }

    #[tokio::test]
    async fn memories_are_scoped_per_pair() {
        let db = Database::open_in_memory().await.unwrap();
        apply_memory_patch(&db, "u", "f1", patch(&[("k", json!(1))]))
            .await
            .unwrap();

        let other = load_memory(&db, "u", "f2").await.unwrap();
        assert!(other.is_empty());
    }
}
