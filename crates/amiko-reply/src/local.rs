// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local rule-based reply of last resort.
//!
//! Used when no provider is configured or every provider variant fails.
//! Infallible by design: always returns a non-empty reply.

use std::sync::LazyLock;

use regex::Regex;

static GREETING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(hi|hello|hey)\b").expect("greeting pattern is valid"));

static AI_TOPIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bai\b").expect("ai topic pattern is valid"));

static QUESTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(what|why|how|where|when)\b").expect("question pattern is valid")
});

/// Produces a rule-based reply for the given message and personality tags.
///
/// Intents are checked in order: greeting, "how are you", question form,
/// generic acknowledgment. The "how are you" check runs before the question
/// check so "how are you?" is not treated as a generic question.
pub fn local_reply(message: &str, tags: &[String]) -> String {
    let normalized = message.trim().to_lowercase();
    let playful = has_tag(tags, "playful");
    let supportive = has_tag(tags, "supportive");

    if GREETING_RE.is_match(&normalized) {
        return if playful {
            "Hey there! I'm feeling great 😄".to_string()
        } else {
            "Hey there! I'm here and ready to chat.".to_string()
        };
    }

    if normalized.contains("how are you")
        || normalized.contains("how's it going")
        || normalized.contains("how r u")
    {
        return if supportive {
            "I'm doing well, thanks for asking! More importantly, how are you feeling today?"
                .to_string()
        } else {
            "I'm doing well, thanks for asking! What's on your mind?".to_string()
        };
    }

    if is_question(&normalized) {
        if AI_TOPIC_RE.is_match(&normalized) {
            return "AI stands for artificial intelligence. It's software that learns patterns \
                    from data so it can answer questions and chat, a bit like what I'm doing \
                    right now!"
                .to_string();
        }
        return "That's a good question! Tell me a little more so I can give you a better answer."
            .to_string();
    }

    let mut reply = String::new();
    if playful {
        reply.push_str("Ooh, interesting! ");
    }
    reply.push_str("I hear you. Tell me more about that.");
    if supportive {
        reply.push_str(" I'm here for you.");
    }
    reply
}

fn is_question(normalized: &str) -> bool {
    normalized.ends_with('?') || QUESTION_RE.is_match(normalized)
}

fn has_tag(tags: &[String], wanted: &str) -> bool {
    tags.iter().any(|t| t.eq_ignore_ascii_case(wanted))
}
