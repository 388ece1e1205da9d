// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./amiko.toml` > `~/.config/amiko/amiko.toml` >
//! `/etc/amiko/amiko.toml` with environment variable overrides via the
//! `AMIKO_` prefix.

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::AmikoConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/amiko/amiko.toml` (system-wide)
/// 3. `~/.config/amiko/amiko.toml` (user XDG config)
/// 4. `./amiko.toml` (local directory)
/// 5. `AMIKO_*` environment variables
pub fn load_config() -> Result<AmikoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AmikoConfig::default()))
        .merge(Toml::file("/etc/amiko/amiko.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("amiko/amiko.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("amiko.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit inline configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<AmikoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AmikoConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<AmikoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AmikoConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `AMIKO_GEMINI_API_KEY` must map to
/// `gemini.api_key`, not `gemini.api.key`.
fn env_provider() -> Env {
    Env::prefixed("AMIKO_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("gemini_", "gemini.", 1)
            .replacen("reply_", "reply.", 1)
            .replacen("moderation_", "moderation.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("gateway_", "gateway.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_from_str_overrides_defaults() {
        let config = load_config_from_str(
            r#"
            [agent]
            name = "buddy"
            log_level = "debug"

            [gemini]
            api_key = "test-key"
            model = "gemini-2.0-pro"
            "#,
        )
        .unwrap();
        assert_eq!(config.agent.name, "buddy");
        assert_eq!(config.agent.log_level, "debug");
        assert_eq!(config.gemini.api_key.as_deref(), Some("test-key"));
        assert_eq!(config.gemini.model, "gemini-2.0-pro");
        // Untouched sections keep defaults.
        assert_eq!(config.reply.context_turns, 10);
    }

    #[test]
    fn load_from_empty_str_yields_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.agent.name, "amiko");
        assert_eq!(config.gateway.host, "127.0.0.1");
    }

    #[test]
    fn invalid_section_key_is_an_error() {
        let result = load_config_from_str("[agent]\nnot_a_key = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn reply_limits_parse() {
        let config = load_config_from_str(
            "[reply]\ncontext_turns = 5\nmax_reply_chars = 400\n",
        )
        .unwrap();
        assert_eq!(config.reply.context_turns, 5);
        assert_eq!(config.reply.max_reply_chars, 400);
    }
}
