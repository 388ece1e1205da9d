// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini provider variants for the Amiko chat backend.
//!
//! Two [`TextProvider`] implementations share the same response-shape
//! decoder: [`GeminiClient`] (primary, single-shot `generateContent`) and
//! [`GeminiRestClient`] (REST fallback over an ordered endpoint list). The
//! reply pipeline decides the fallback order between them.

pub mod client;
pub mod decode;
pub mod rest;

use std::sync::Arc;
use std::time::Duration;

use amiko_config::model::GeminiConfig;
use amiko_core::{AmikoError, TextProvider};
use async_trait::async_trait;
use tracing::info;

pub use client::GeminiClient;
pub use rest::GeminiRestClient;

#[async_trait]
impl TextProvider for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String, AmikoError> {
        self.generate_content(prompt).await
    }
}

#[async_trait]
impl TextProvider for GeminiRestClient {
    fn name(&self) -> &str {
        "gemini-rest"
    }

    async fn generate(&self, prompt: &str) -> Result<String, AmikoError> {
        self.generate_content(prompt).await
    }
}

/// Constructs the (primary, fallback) provider pair from configuration.
///
/// Returns `None` when no API key is configured: the pipeline then serves
/// local rule-based replies only. The pair is built explicitly and injected
/// into the pipeline by the caller; there is no process-global client.
pub fn providers_from_config(
    config: &GeminiConfig,
) -> Result<Option<(Arc<dyn TextProvider>, Arc<dyn TextProvider>)>, AmikoError> {
    let Some(api_key) = config.api_key.as_ref().filter(|k| !k.is_empty()) else {
        info!("no Gemini API key configured, provider calls disabled");
        return Ok(None);
    };

    let timeout = Duration::from_secs(config.request_timeout_secs);
    let primary = GeminiClient::new(api_key.clone(), config.model.clone(), timeout)?;
    let fallback = GeminiRestClient::new(api_key.clone(), config.model.clone(), timeout)?;

    info!(model = config.model.as_str(), "Gemini providers initialized");
    Ok(Some((Arc::new(primary), Arc::new(fallback))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_api_key_yields_no_providers() {
        let config = GeminiConfig::default();
        assert!(providers_from_config(&config).unwrap().is_none());
    }

    #[test]
    fn empty_api_key_yields_no_providers() {
        let config = GeminiConfig {
            api_key: Some(String::new()),
            ..GeminiConfig::default()
        };
        assert!(providers_from_config(&config).unwrap().is_none());
    }

    #[test]
    fn api_key_yields_provider_pair() {
        let config = GeminiConfig {
            api_key: Some("test-key".into()),
            ..GeminiConfig::default()
        };
        let (primary, fallback) = providers_from_config(&config).unwrap().unwrap();
        assert_eq!(primary.name(), "gemini");
        assert_eq!(fallback.name(), "gemini-rest");
    }
}
