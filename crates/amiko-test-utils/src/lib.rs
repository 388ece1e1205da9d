// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Amiko tests.
//!
//! Provides a mock text provider for fast, deterministic, CI-runnable
//! tests without external API calls.

pub mod mock_provider;

pub use mock_provider::{MockOutcome, MockProvider};
