// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Friend CRUD operations. Personality tags are stored as a JSON array.

use amiko_core::AmikoError;
use rusqlite::{params, OptionalExtension};

use crate::database::{map_tr_err, Database};
use crate::models::Friend;

fn row_to_friend(row: &rusqlite::Row<'_>) -> Result<Friend, rusqlite::Error> {
    let personality_json: String = row.get(3)?;
    Ok(Friend {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        name: row.get(2)?,
        personality: serde_json::from_str(&personality_json).unwrap_or_default(),
        backstory: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Inserts a new friend.
pub async fn create_friend(db: &Database, friend: &Friend) -> Result<(), AmikoError> {
    let friend = friend.clone();
    let personality_json =
        serde_json::to_string(&friend.personality).map_err(|e| AmikoError::Storage {
            source: Box::new(e),
        })?;
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO friends (id, owner_id, name, personality, backstory, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    friend.id,
                    friend.owner_id,
                    friend.name,
                    personality_json,
                    friend.backstory,
                    friend.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Looks up a friend by id.
pub async fn get_friend(db: &Database, id: &str) -> Result<Option<Friend>, AmikoError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let friend = conn
                .query_row(
                    "SELECT id, owner_id, name, personality, backstory, created_at
                     FROM friends WHERE id = ?1",
                    params![id],
                    row_to_friend,
                )
                .optional()?;
            Ok(friend)
        })
        .await
        .map_err(map_tr_err)
}

/// Lists a user's friends in creation order.
pub async fn list_friends(db: &Database, owner_id: &str) -> Result<Vec<Friend>, AmikoError> {
    let owner_id = owner_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, owner_id, name, personality, backstory, created_at
                 FROM friends WHERE owner_id = ?1
                 ORDER BY created_at ASC, id ASC",
            )?;
            let friends = stmt
                .query_map(params![owner_id], row_to_friend)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(friends)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn friend(id: &str, owner: &str, name: &str) -> Friend {
        Friend {
            id: id.into(),
            owner_id: owner.into(),
            name: name.into(),
            personality: vec!["supportive".into(), "playful".into()],
            backstory: "Loves rainy days.".into(),
            created_at: "2026-01-01T00:00:00Z".into(),
        }
    }

    #[tokio::test]
    async fn create_and_get_round_trips_personality() {
        let db = Database::open_in_memory().await.unwrap();
        let f = friend("f1", "u1", "Aanya");
        create_friend(&db, &f).await.unwrap();

        let loaded = get_friend(&db, "f1").await.unwrap().unwrap();
        assert_eq!(loaded, f);
        assert_eq!(loaded.persona().name, "Aanya");
    }

    #[tokio::test]
    async fn missing_friend_is_none() {
        let db = Database::open_in_memory().await.unwrap();
        assert!(get_friend(&db, "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_is_scoped_to_owner() {
        let db = Database::open_in_memory().await.unwrap();
        create_friend(&db, &friend("f1", "u1", "Aanya")).await.unwrap();
        create_friend(&db, &friend("f2", "u1", "Rohan")).await.unwrap();
        create_friend(&db, &friend("f3", "u2", "Mira")).await.unwrap();

        let friends = list_friends(&db, "u1").await.unwrap();
        assert_eq!(friends.len(), 2);
        assert!(friends.iter().all(|f| f.owner_id == "u1"));
    }
}
