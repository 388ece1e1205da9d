// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Amiko chat backend.
//!
//! Provides the foundational error type, domain types, and the provider
//! trait used throughout the Amiko workspace.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::AmikoError;
pub use traits::TextProvider;
pub use types::{
    ChatMessage, ContextWindow, ConversationTurn, MemoryBlob, ModerationVerdict, Persona,
    ReplyRequest, TurnOrigin,
};
