// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock text provider for deterministic testing.
//!
//! `MockProvider` implements `TextProvider` with a FIFO queue of canned
//! outcomes, enabling fast tests without external API calls.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use amiko_core::{AmikoError, TextProvider};
use async_trait::async_trait;

/// One canned generation outcome.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Return this text.
    Ok(String),
    /// Fail with a provider error carrying this message.
    Err(String),
}

/// A mock text provider that replays pre-configured outcomes.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty,
/// a default "mock response" text is returned. Every prompt seen is
/// recorded for assertions.
pub struct MockProvider {
    name: String,
    outcomes: Mutex<VecDeque<MockOutcome>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    /// Create a new mock provider with an empty outcome queue.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcomes: Mutex::new(VecDeque::new()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock provider pre-loaded with successful responses.
    pub fn with_responses(name: impl Into<String>, responses: Vec<&str>) -> Self {
        let provider = Self::new(name);
        for text in responses {
            provider.push_ok(text);
        }
        provider
    }

    /// Queue a successful response.
    pub fn push_ok(&self, text: &str) {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(MockOutcome::Ok(text.to_string()));
    }

    /// Queue a failure.
    pub fn push_err(&self, message: &str) {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(MockOutcome::Err(message.to_string()));
    }

    /// Number of generate calls seen so far.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// All prompts seen so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, prompt: &str) -> Result<String, AmikoError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(MockOutcome::Ok("mock response".to_string()));

        match outcome {
            MockOutcome::Ok(text) => Ok(text),
            MockOutcome::Err(message) => Err(AmikoError::Provider {
                message,
                source: None,
            }),
        }
    }
}
