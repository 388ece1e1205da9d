// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Amiko chat backend.

use thiserror::Error;

/// The primary error type used across Amiko crates.
#[derive(Debug, Error)]
pub enum AmikoError {
    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// LLM provider errors (API failure, endpoint exhaustion, unusable response).
    ///
    /// Always recovered inside the reply pipeline: a provider error triggers
    /// the next fallback tier, never a failed request.
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Gateway/realtime channel errors (bind failure, closed socket).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_message() {
        let err = AmikoError::Provider {
            message: "all REST endpoints failed".into(),
            source: None,
        };
        assert_eq!(err.to_string(), "provider error: all REST endpoints failed");
    }

    #[test]
    fn storage_error_wraps_source() {
        let err = AmikoError::Storage {
            source: Box::new(std::io::Error::other("disk full")),
        };
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn internal_error_displays_detail() {
        let err = AmikoError::Internal("no such friend: f9".into());
        assert_eq!(err.to_string(), "internal error: no such friend: f9");
    }
}
