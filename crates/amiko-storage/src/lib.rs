// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Amiko chat backend.
//!
//! Provides WAL-mode SQLite storage with a single-writer concurrency model
//! via `tokio-rusqlite`, typed CRUD operations for friends, messages, and
//! memory blobs, and context assembly for the reply pipeline.

pub mod context;
pub mod database;
pub mod models;
pub mod queries;

pub use context::load_context;
pub use database::Database;
pub use models::Friend;
