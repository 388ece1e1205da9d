// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message CRUD operations.

use amiko_core::{AmikoError, ChatMessage};
use rusqlite::params;

use crate::database::{map_tr_err, Database};

fn row_to_message(row: &rusqlite::Row<'_>) -> Result<ChatMessage, rusqlite::Error> {
    Ok(ChatMessage {
        id: row.get(0)?,
        sender_id: row.get(1)?,
        receiver_id: row.get(2)?,
        content: row.get(3)?,
        from_ai: row.get::<_, i64>(4)? != 0,
        created_at: row.get(5)?,
    })
}

/// Inserts a new message.
pub async fn insert_message(db: &Database, msg: &ChatMessage) -> Result<(), AmikoError> {
    let msg = msg.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO messages (id, sender_id, receiver_id, content, from_ai, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    msg.id,
                    msg.sender_id,
                    msg.receiver_id,
                    msg.content,
                    msg.from_ai as i64,
                    msg.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Returns the most recent messages between a user and a friend, re-ordered
/// oldest first.
///
/// Selection picks the newest `limit` rows; the returned slice always ends
/// at the latest message even when the pair's history is longer.
pub async fn recent_between(
    db: &Database,
    user_id: &str,
    friend_id: &str,
    limit: usize,
) -> Result<Vec<ChatMessage>, AmikoError> {
    let user_id = user_id.to_string();
    let friend_id = friend_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, sender_id, receiver_id, content, from_ai, created_at
                 FROM messages
                 WHERE (sender_id = ?1 AND receiver_id = ?2)
                    OR (sender_id = ?2 AND receiver_id = ?1)
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?3",
            )?;
            let mut messages = stmt
                .query_map(params![user_id, friend_id, limit as i64], row_to_message)?
                .collect::<Result<Vec<_>, _>>()?;
            messages.reverse();
            Ok(messages)
        })
        .await
        .map_err(map_tr_err)
}

/// Returns the full conversation between a user and a friend, oldest first.
pub async fn history_between(
    db: &Database,
    user_id: &str,
    friend_id: &str,
) -> Result<Vec<ChatMessage>, AmikoError> {
    let user_id = user_id.to_string();
    let friend_id = friend_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, sender_id, receiver_id, content, from_ai, created_at
                 FROM messages
                 WHERE (sender_id = ?1 AND receiver_id = ?2)
                    OR (sender_id = ?2 AND receiver_id = ?1)
                 ORDER BY created_at ASC, id ASC",
            )?;
            let messages = stmt
                .query_map(params![user_id, friend_id], row_to_message)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(messages)
        })
        .await
        .map_err(map_tr_err)
}
