// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Amiko workspace.

use serde::{Deserialize, Serialize};

/// Free-form memory document keyed by string, e.g. `latestSnippet`,
/// `lastInteraction`. Opaque to the reply pipeline.
pub type MemoryBlob = serde_json::Map<String, serde_json::Value>;

/// An AI friend persona. Immutable for the duration of one reply computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    /// Display name of the friend.
    pub name: String,
    /// Personality tags (unordered, duplicates allowed), e.g. "playful".
    #[serde(default)]
    pub personality: Vec<String>,
    /// Free-form backstory text.
    #[serde(default)]
    pub backstory: String,
}

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnOrigin {
    /// Human user.
    User,
    /// AI friend.
    Friend,
}

/// One turn of conversation history supplied as prompt context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Origin of the turn.
    pub origin: TurnOrigin,
    /// Message text.
    pub text: String,
    /// ISO 8601 timestamp.
    pub timestamp: String,
}

/// Bounded recent-turn history plus the free-form memory blob for one
/// (user, friend) pair.
///
/// Rebuilt from storage on every send; `turns` never exceeds the configured
/// window size and is ordered oldest first.
#[derive(Debug, Clone, Default)]
pub struct ContextWindow {
    /// Most recent turns, oldest first.
    pub turns: Vec<ConversationTurn>,
    /// Opaque memory document. Empty when no prior memory exists.
    pub memory: MemoryBlob,
}

/// Inputs for one reply computation. Constructed fresh per send; not persisted.
#[derive(Debug, Clone)]
pub struct ReplyRequest {
    /// Identifier of the requesting user.
    pub requester_id: String,
    /// The friend persona replying.
    pub persona: Persona,
    /// The inbound user message. Never empty (caller-validated).
    pub message: String,
    /// Recent history and memory for prompt construction.
    pub context: ContextWindow,
    /// When set, the safety gate runs on the reply before it is returned.
    pub safe_mode: bool,
}

/// Outcome of the safety gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationVerdict {
    /// Text passed through unchanged.
    Allowed(String),
    /// Text was blocked; carries the canned replacement.
    Blocked(String),
}

/// A persisted chat message between a user and a friend persona.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message id.
    pub id: String,
    /// Sender (user id or friend id).
    pub sender_id: String,
    /// Receiver (user id or friend id).
    pub receiver_id: String,
    /// Message text.
    pub content: String,
    /// True when the message was produced by the AI friend.
    pub from_ai: bool,
    /// ISO 8601 timestamp.
    pub created_at: String,
}
