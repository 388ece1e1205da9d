// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Primary Gemini variant: single-shot `generateContent` calls.
//!
//! Provides [`GeminiClient`] which handles request construction,
//! authentication via query-string key, and response-shape normalization.

use std::time::Duration;

use amiko_core::AmikoError;
use serde_json::{json, Value};
use tracing::debug;

use crate::decode::decode_response;

/// Base URL for the Generative Language API used by the primary variant.
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Sampling temperature sent with every generation request.
const TEMPERATURE: f64 = 0.7;

/// Primary Gemini client issuing `generateContent` requests.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Creates a new Gemini client.
    ///
    /// `timeout` bounds each HTTP attempt; exceeding it surfaces as a
    /// provider error, which the pipeline treats as a soft variant failure.
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, AmikoError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AmikoError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            api_key,
            model,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Returns the model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Sends a single-shot generation request and returns normalized text.
    pub async fn generate_content(&self, prompt: &str) -> Result<String, AmikoError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let payload = generation_payload(prompt);

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AmikoError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, model = %self.model, "generateContent response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AmikoError::Provider {
                message: format!("API returned {status}: {body}"),
                source: None,
            });
        }

        let body: Value = response.json().await.map_err(|e| AmikoError::Provider {
            message: format!("failed to parse API response: {e}"),
            source: Some(Box::new(e)),
        })?;

        Ok(decode_response(&body))
    }
}

/// Builds the `generateContent` request body.
pub(crate) fn generation_payload(prompt: &str) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{"text": prompt}]
        }],
        "generationConfig": {"temperature": TEMPERATURE}
    })
}
