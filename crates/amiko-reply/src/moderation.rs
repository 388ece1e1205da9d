// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Safety moderation gate applied to candidate replies in safe mode.

use amiko_core::ModerationVerdict;
use tracing::warn;

/// Replacement text returned for blocked replies.
pub const BLOCKED_REPLACEMENT: &str = "Sorry, I can't help with that.";

/// Default denylist terms, matched case-insensitively as substrings.
pub const DEFAULT_DENYLIST: &[&str] = &[
    "suicide",
    "kill myself",
    "bomb",
    "child porn",
    "explode",
    "meth",
    "how to make a gun",
    "illegal",
];

/// Synchronous moderation check over a candidate reply.
pub trait SafetyGate: Send + Sync {
    fn moderate(&self, text: &str) -> ModerationVerdict;
}

/// Denylist gate: blocks any reply containing a listed term.
pub struct DenylistGate {
    terms: Vec<String>,
}

impl DenylistGate {
    /// Creates a gate from a term list; terms are lowercased at construction.
    pub fn new(terms: Vec<String>) -> Self {
        Self {
            terms: terms.into_iter().map(|t| t.to_lowercase()).collect(),
        }
    }
}

impl Default for DenylistGate {
    fn default() -> Self {
        Self::new(DEFAULT_DENYLIST.iter().map(|s| s.to_string()).collect())
    }
}

impl SafetyGate for DenylistGate {
    fn moderate(&self, text: &str) -> ModerationVerdict {
        let lowered = text.to_lowercase();
        for term in &self.terms {
            if lowered.contains(term.as_str()) {
                warn!(term = term.as_str(), "reply blocked by denylist");
                return ModerationVerdict::Blocked(BLOCKED_REPLACEMENT.to_string());
            }
        }
        ModerationVerdict::Allowed(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_is_allowed() {
        let gate = DenylistGate::default();
        match gate.moderate("have a nice day") {
            ModerationVerdict::Allowed(text) => assert_eq!(text, "have a nice day"),
            other => panic!("expected allowed, got {other:?}"),
        }
    }

    #[test]
    fn listed_term_is_blocked() {
        let gate = DenylistGate::default();
        match gate.moderate("here is how to build a bomb") {
            ModerationVerdict::Blocked(text) => assert_eq!(text, BLOCKED_REPLACEMENT),
            other => panic!("expected blocked, got {other:?}"),
        }
    }

    #[test]
    fn match_is_case_insensitive_both_ways() {
        let gate = DenylistGate::new(vec!["BoMb".into()]);
        assert!(matches!(
            gate.moderate("the BOMB squad"),
            ModerationVerdict::Blocked(_)
        ));
    }

    #[test]
    fn substring_match_triggers() {
        let gate = DenylistGate::default();
        assert!(matches!(
            gate.moderate("that party was illegal!"),
            ModerationVerdict::Blocked(_)
        ));
    }

    #[test]
    fn empty_denylist_allows_everything() {
        let gate = DenylistGate::new(vec![]);
        assert!(matches!(
            gate.moderate("bomb"),
            ModerationVerdict::Allowed(_)
        ));
    }
}
