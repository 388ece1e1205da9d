// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed CRUD operations over the database.

pub mod friends;
pub mod memory;
pub mod messages;
