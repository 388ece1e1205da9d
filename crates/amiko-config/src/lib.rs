// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Amiko chat backend.
//!
//! Layered TOML + environment configuration built on Figment.

pub mod loader;
pub mod model;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::AmikoConfig;
