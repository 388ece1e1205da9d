// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Amiko chat backend.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level Amiko configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AmikoConfig {
    /// Service identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Gemini provider settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Reply pipeline settings.
    #[serde(default)]
    pub reply: ReplyConfig,

    /// Safety gate settings.
    #[serde(default)]
    pub moderation: ModerationConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP/WebSocket gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the service.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "amiko".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Gemini provider configuration.
///
/// When `api_key` is absent both provider variants are disabled and the
/// reply pipeline serves local rule-based replies only.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// Gemini API key. `None` disables provider calls entirely.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier used by both provider variants.
    #[serde(default = "default_model")]
    pub model: String,

    /// Per-attempt request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_request_timeout_secs() -> u64 {
    20
}

/// Reply pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReplyConfig {
    /// Maximum number of recent turns supplied as prompt context.
    #[serde(default = "default_context_turns")]
    pub context_turns: usize,

    /// Maximum length of a sanitized reply in characters.
    #[serde(default = "default_max_reply_chars")]
    pub max_reply_chars: usize,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            context_turns: default_context_turns(),
            max_reply_chars: default_max_reply_chars(),
        }
    }
}

fn default_context_turns() -> usize {
    10
}

fn default_max_reply_chars() -> usize {
    1000
}

/// Safety gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModerationConfig {
    /// Case-insensitive denylist of unsafe terms and phrases.
    #[serde(default = "default_denylist")]
    pub denylist: Vec<String>,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            denylist: default_denylist(),
        }
    }
}

fn default_denylist() -> Vec<String> {
    [
        "suicide",
        "kill myself",
        "bomb",
        "child porn",
        "explode",
        "meth",
        "how to make a gun",
        "illegal",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("amiko").join("amiko.db"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_else(|| "amiko.db".to_string())
}

fn default_wal_mode() -> bool {
    true
}

/// HTTP/WebSocket gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Enable the gateway server.
    #[serde(default = "default_gateway_enabled")]
    pub enabled: bool,

    /// Host address to bind.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bearer token for API auth. `None` rejects all requests (fail-closed).
    #[serde(default)]
    pub bearer_token: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            enabled: default_gateway_enabled(),
            host: default_gateway_host(),
            port: default_gateway_port(),
            bearer_token: None,
        }
    }
}

fn default_gateway_enabled() -> bool {
    true
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    3900
}
