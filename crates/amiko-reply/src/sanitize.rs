// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Output sanitization: script-tag stripping and length capping.
//!
//! Runs on every reply path, including local fallbacks and moderation
//! replacements.

use std::sync::LazyLock;

use regex::Regex;

static SCRIPT_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script>").expect("script tag pattern is valid")
});

/// Strips `<script>` blocks and caps the reply at `max_chars` characters.
///
/// The cap counts `char`s, not bytes, so multibyte text is never split
/// mid-character.
pub fn sanitize(text: &str, max_chars: usize) -> String {
    let stripped = SCRIPT_TAG_RE.replace_all(text, "");
    stripped.chars().take(max_chars).collect()
}
