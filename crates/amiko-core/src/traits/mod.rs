// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for pluggable Amiko components.

pub mod provider;

pub use provider::TextProvider;
