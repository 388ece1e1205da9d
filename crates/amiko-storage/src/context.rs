// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Context assembly: recent conversation window plus the memory blob.

use amiko_core::{AmikoError, ContextWindow, ConversationTurn, TurnOrigin};

use crate::database::Database;
use crate::queries::{memory, messages};

/// Builds the reply context for one (user, friend) pair.
///
/// Pulls the last `turn_limit` messages between the pair, oldest first, and
/// attaches the pair's memory blob. Missing history and missing memory both
/// read as empty.
pub async fn load_context(
    db: &Database,
    user_id: &str,
    friend_id: &str,
    turn_limit: usize,
) -> Result<ContextWindow, AmikoError> {
    let recent = messages::recent_between(db, user_id, friend_id, turn_limit).await?;
    let blob = memory::load_memory(db, user_id, friend_id).await?;

    let turns = recent
        .into_iter()
        .map(|msg| ConversationTurn {
            origin: if msg.from_ai {
                TurnOrigin::Friend
            } else {
                TurnOrigin::User
            },
            text: msg.content,
            timestamp: msg.created_at,
        })
        .collect();

    Ok(ContextWindow { turns, memory: blob })
}
