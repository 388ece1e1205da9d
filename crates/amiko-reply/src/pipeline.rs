// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reply computation pipeline.
//!
//! Orders the provider variants, applies the echo-retry policy, falls back
//! to local rule-based replies, then runs the personality transform, the
//! safety gate (in safe mode), and output sanitization. The pipeline is
//! infallible: every request yields a non-empty reply.

use std::sync::Arc;

use amiko_core::{ModerationVerdict, ReplyRequest, TextProvider};
use tracing::{debug, info, warn};

use crate::local::local_reply;
use crate::moderation::SafetyGate;
use crate::personality::apply_personality;
use crate::prompt::{build_prompt, build_retry_prompt};
use crate::sanitize::sanitize;

/// True when a candidate reply is just the user's message echoed back.
///
/// Comparison is on trimmed text; case differences count as distinct.
pub fn is_echo(candidate: &str, original: &str) -> bool {
    candidate.trim() == original.trim()
}

/// Tunables for the reply pipeline.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Hard cap on reply length, in characters.
    pub max_reply_chars: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_reply_chars: 1000,
        }
    }
}

/// The reply-generation pipeline.
///
/// Providers are injected; `None` means the variant is not configured and
/// is skipped without counting as a failure.
pub struct ReplyPipeline {
    primary: Option<Arc<dyn TextProvider>>,
    fallback: Option<Arc<dyn TextProvider>>,
    gate: Arc<dyn SafetyGate>,
    options: PipelineOptions,
}

impl ReplyPipeline {
    pub fn new(
        primary: Option<Arc<dyn TextProvider>>,
        fallback: Option<Arc<dyn TextProvider>>,
        gate: Arc<dyn SafetyGate>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            primary,
            fallback,
            gate,
            options,
        }
    }

    /// Computes a reply for the request. Never fails and never returns an
    /// empty string.
    pub async fn compute_reply(&self, request: &ReplyRequest) -> String {
        let prompt = build_prompt(
            &request.persona,
            &request.context,
            &request.message,
            request.safe_mode,
        );

        let mut reply = None;
        for provider in [self.primary.as_ref(), self.fallback.as_ref()]
            .into_iter()
            .flatten()
        {
            if let Some(text) = self.try_variant(provider.as_ref(), &prompt, request).await {
                reply = Some(text);
                break;
            }
        }

        let reply = match reply {
            Some(text) => text,
            None => {
                info!(
                    requester = request.requester_id.as_str(),
                    "all provider variants unavailable, using local reply"
                );
                local_reply(&request.message, &request.persona.personality)
            }
        };

        let reply = apply_personality(&reply, &request.persona.personality);

        let reply = if request.safe_mode {
            match self.gate.moderate(&reply) {
                ModerationVerdict::Allowed(text) => text,
                ModerationVerdict::Blocked(replacement) => replacement,
            }
        } else {
            reply
        };

        sanitize(&reply, self.options.max_reply_chars)
    }

    /// Runs one provider variant: a single attempt, plus exactly one retry
    /// when the attempt echoes the user's message. Returns `None` when the
    /// variant cannot produce an acceptable reply.
    async fn try_variant(
        &self,
        provider: &dyn TextProvider,
        prompt: &str,
        request: &ReplyRequest,
    ) -> Option<String> {
        let text = match provider.generate(prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!(provider = provider.name(), error = %e, "provider variant failed");
                return None;
            }
        };

        if text.trim().is_empty() {
            warn!(provider = provider.name(), "provider returned empty reply");
            return None;
        }

        if !is_echo(&text, &request.message) {
            if !self.survives_sanitize(&text) {
                warn!(provider = provider.name(), "reply is empty after sanitization");
                return None;
            }
            debug!(provider = provider.name(), "provider variant accepted");
            return Some(text);
        }

        info!(provider = provider.name(), "echo detected, retrying once");
        let retry_prompt = build_retry_prompt(prompt);
        match provider.generate(&retry_prompt).await {
            Ok(retry)
                if !retry.trim().is_empty()
                    && !is_echo(&retry, &request.message)
                    && self.survives_sanitize(&retry) =>
            {
                Some(retry)
            }
            Ok(_) => {
                warn!(provider = provider.name(), "retry still echoed or empty");
                None
            }
            Err(e) => {
                warn!(provider = provider.name(), error = %e, "echo retry failed");
                None
            }
        }
    }

    /// True when the text still has visible content once sanitized. Replies
    /// made up entirely of stripped markup must not win a variant.
    fn survives_sanitize(&self, text: &str) -> bool {
        !sanitize(text, self.options.max_reply_chars).trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moderation::{DenylistGate, BLOCKED_REPLACEMENT};
    use amiko_core::{ContextWindow, Persona};
    use amiko_test_utils::MockProvider;

    fn request(message: &str, tags: &[&str], safe_mode: bool) -> ReplyRequest {
        ReplyRequest {
            requester_id: "user-1".into(),
            persona: Persona {
                name: "Aanya".into(),
                personality: tags.iter().map(|s| s.to_string()).collect(),
                backstory: String::new(),
            },
            message: message.into(),
            context: ContextWindow::default(),
            safe_mode,
        }
    }

    fn pipeline(
        primary: Option<Arc<MockProvider>>,
        fallback: Option<Arc<MockProvider>>,
    ) -> ReplyPipeline {
        ReplyPipeline::new(
            primary.map(|p| p as Arc<dyn TextProvider>),
            fallback.map(|p| p as Arc<dyn TextProvider>),
            Arc::new(DenylistGate::default()),
            PipelineOptions::default(),
        )
    }

    #[test]
    fn echo_compares_trimmed() {
        assert!(is_echo("  hello ", "hello"));
        assert!(!is_echo("Hello", "hello"));
        assert!(!is_echo("hello there", "hello"));
    }

    #[tokio::test]
    async fn no_providers_uses_local_reply() {
        let pipeline = pipeline(None, None);
        let reply = pipeline.compute_reply(&request("hi", &[], false)).await;
        assert_eq!(reply, "Hey there! I'm here and ready to chat.");
    }

    #[tokio::test]
    async fn primary_success_skips_fallback() {
        let primary = Arc::new(MockProvider::with_responses("primary", vec!["from primary"]));
        let fallback = Arc::new(MockProvider::new("fallback"));

        let pipeline = pipeline(Some(primary.clone()), Some(fallback.clone()));
        let reply = pipeline.compute_reply(&request("hello", &[], false)).await;

        assert_eq!(reply, "from primary");
        assert_eq!(primary.call_count(), 1);
        assert_eq!(fallback.call_count(), 0);
    }

    #[tokio::test]
    async fn primary_error_falls_back() {
        let primary = Arc::new(MockProvider::new("primary"));
        primary.push_err("timeout");
        let fallback = Arc::new(MockProvider::with_responses("fallback", vec!["from rest"]));

        let pipeline = pipeline(Some(primary.clone()), Some(fallback.clone()));
        let reply = pipeline.compute_reply(&request("hello", &[], false)).await;

        assert_eq!(reply, "from rest");
        assert_eq!(primary.call_count(), 1);
        assert_eq!(fallback.call_count(), 1);
    }

    #[tokio::test]
    async fn all_variants_fail_uses_local_reply() {
        let primary = Arc::new(MockProvider::new("primary"));
        primary.push_err("down");
        let fallback = Arc::new(MockProvider::new("fallback"));
        fallback.push_err("also down");

        let pipeline = pipeline(Some(primary), Some(fallback));
        let reply = pipeline
            .compute_reply(&request("I went hiking yesterday", &[], false))
            .await;
        assert_eq!(reply, "I hear you. Tell me more about that.");
    }

    #[tokio::test]
    async fn echo_triggers_exactly_one_retry() {
        let primary = Arc::new(MockProvider::new("primary"));
        primary.push_ok("hello"); // echoes the message
        primary.push_ok("a real answer");

        let pipeline = pipeline(Some(primary.clone()), None);
        let reply = pipeline.compute_reply(&request("hello", &[], false)).await;

        assert_eq!(reply, "a real answer");
        assert_eq!(primary.call_count(), 2);
        let prompts = primary.prompts();
        assert!(prompts[1].starts_with("DO NOT ECHO THE USER."));
    }

    #[tokio::test]
    async fn echoed_retry_moves_to_fallback() {
        let primary = Arc::new(MockProvider::new("primary"));
        primary.push_ok("hello");
        primary.push_ok("hello"); // retry still echoes
        let fallback = Arc::new(MockProvider::with_responses("fallback", vec!["rescued"]));

        let pipeline = pipeline(Some(primary.clone()), Some(fallback.clone()));
        let reply = pipeline.compute_reply(&request("hello", &[], false)).await;

        assert_eq!(reply, "rescued");
        assert_eq!(primary.call_count(), 2);
        assert_eq!(fallback.call_count(), 1);
    }

    #[tokio::test]
    async fn empty_reply_skips_variant_without_retry() {
        let primary = Arc::new(MockProvider::new("primary"));
        primary.push_ok("   ");
        let fallback = Arc::new(MockProvider::with_responses("fallback", vec!["rescued"]));

        let pipeline = pipeline(Some(primary.clone()), Some(fallback.clone()));
        let reply = pipeline.compute_reply(&request("hello", &[], false)).await;

        assert_eq!(reply, "rescued");
        assert_eq!(primary.call_count(), 1);
    }

    #[tokio::test]
    async fn safe_mode_blocks_denylisted_reply() {
        let primary = Arc::new(MockProvider::with_responses(
            "primary",
            vec!["here is how to build a bomb"],
        ));

        let pipeline = pipeline(Some(primary), None);
        let reply = pipeline.compute_reply(&request("tell me", &[], true)).await;
        assert_eq!(reply, BLOCKED_REPLACEMENT);
    }

    #[tokio::test]
    async fn gate_is_skipped_outside_safe_mode() {
        let primary = Arc::new(MockProvider::with_responses(
            "primary",
            vec!["the word bomb appears here"],
        ));

        let pipeline = pipeline(Some(primary), None);
        let reply = pipeline.compute_reply(&request("tell me", &[], false)).await;
        assert_eq!(reply, "the word bomb appears here");
    }

    #[tokio::test]
    async fn sanitize_runs_on_provider_replies() {
        let primary = Arc::new(MockProvider::with_responses(
            "primary",
            vec!["hi<script>alert(1)</script> there"],
        ));

        let pipeline = pipeline(Some(primary), None);
        let reply = pipeline.compute_reply(&request("hello", &[], false)).await;
        assert_eq!(reply, "hi there");
    }

    #[tokio::test]
    async fn script_only_reply_falls_back_to_local() {
        let primary = Arc::new(MockProvider::with_responses(
            "primary",
            vec!["<script>alert(1)</script>"],
        ));

        let pipeline = pipeline(Some(primary.clone()), None);
        let reply = pipeline.compute_reply(&request("hello", &[], false)).await;

        assert_eq!(reply, "Hey there! I'm here and ready to chat.");
        assert_eq!(primary.call_count(), 1);
    }

    #[tokio::test]
    async fn script_only_reply_lets_fallback_variant_run() {
        let primary = Arc::new(MockProvider::with_responses(
            "primary",
            vec!["<script>alert(1)</script>"],
        ));
        let fallback = Arc::new(MockProvider::with_responses("fallback", vec!["rescued"]));

        let pipeline = pipeline(Some(primary), Some(fallback.clone()));
        let reply = pipeline.compute_reply(&request("hello", &[], false)).await;

        assert_eq!(reply, "rescued");
        assert_eq!(fallback.call_count(), 1);
    }

    #[tokio::test]
    async fn long_replies_are_capped() {
        let primary = Arc::new(MockProvider::new("primary"));
        let long = "x".repeat(5000);
        primary.push_ok(&long);

        let pipeline = pipeline(Some(primary), None);
        let reply = pipeline.compute_reply(&request("hello", &[], false)).await;
        assert_eq!(reply.chars().count(), 1000);
    }

    #[tokio::test]
    async fn personality_applies_to_provider_replies() {
        let primary = Arc::new(MockProvider::with_responses("primary", vec!["Nice!"]));

        let pipeline = pipeline(Some(primary), None);
        let reply = pipeline
            .compute_reply(&request("look at this", &["playful"], false))
            .await;
        assert_eq!(reply, "Nice! 😊");
    }

    #[tokio::test]
    async fn personality_applies_to_local_replies() {
        let pipeline = pipeline(None, None);
        let reply = pipeline
            .compute_reply(&request("I went hiking yesterday", &["supportive"], false))
            .await;
        assert_eq!(
            reply,
            "I hear you. Tell me more about that. I'm here for you. \
             Remember, I'm always here for you."
        );
    }

    #[tokio::test]
    async fn what_is_ai_gets_canned_local_answer() {
        let pipeline = pipeline(None, None);
        let reply = pipeline
            .compute_reply(&request("what is ai", &[], true))
            .await;
        assert!(reply.contains("artificial intelligence"));
    }
}
