// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! REST fallback variant: direct `generateContent` POSTs against an ordered
//! list of endpoint URL templates.
//!
//! Some deployments serve v1, others v1beta2. Endpoints are tried in order;
//! any transport error or non-2xx status moves to the next. A distinct
//! provider error is raised only after the whole list is exhausted.

use std::time::Duration;

use amiko_core::AmikoError;
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::generation_payload;
use crate::decode::decode_response;

/// Ordered endpoint URL templates (`{model}` is substituted).
const ENDPOINT_TEMPLATES: &[&str] = &[
    "https://generativelanguage.googleapis.com/v1/models/{model}:generateContent",
    "https://generativelanguage.googleapis.com/v1beta2/models/{model}:generateContent",
];

/// REST fallback client for the Generative Language API.
#[derive(Debug, Clone)]
pub struct GeminiRestClient {
    client: reqwest::Client,
    api_key: String,
    endpoints: Vec<String>,
}

impl GeminiRestClient {
    /// Creates a new REST fallback client with the default endpoint list.
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, AmikoError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AmikoError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        let endpoints = ENDPOINT_TEMPLATES
            .iter()
            .map(|t| t.replace("{model}", &model))
            .collect();

        Ok(Self {
            client,
            api_key,
            endpoints,
        })
    }

    /// Overrides the endpoint list (for testing with wiremock).
    #[cfg(test)]
    pub fn with_endpoints(mut self, endpoints: Vec<String>) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Tries each endpoint in order; returns normalized text from the first
    /// successful attempt.
    pub async fn generate_content(&self, prompt: &str) -> Result<String, AmikoError> {
        let payload = generation_payload(prompt);

        for endpoint in &self.endpoints {
            let url = format!("{}?key={}", endpoint, self.api_key);

            let response = match self.client.post(&url).json(&payload).send().await {
                Ok(resp) => resp,
                Err(e) => {
                    warn!(endpoint = endpoint.as_str(), error = %e, "REST attempt failed");
                    continue;
                }
            };

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                warn!(
                    endpoint = endpoint.as_str(),
                    status = %status,
                    body = body.as_str(),
                    "REST attempt returned error status"
                );
                continue;
            }

            match response.json::<Value>().await {
                Ok(body) => {
                    debug!(endpoint = endpoint.as_str(), "REST attempt succeeded");
                    return Ok(decode_response(&body));
                }
                Err(e) => {
                    warn!(endpoint = endpoint.as_str(), error = %e, "REST body parse failed");
                    continue;
                }
            }
        }

        Err(AmikoError::Provider {
            message: "all REST endpoints failed".into(),
            source: None,
        })
    }
}
