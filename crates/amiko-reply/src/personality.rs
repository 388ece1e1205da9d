// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Personality post-processing applied to every reply, whatever produced it.

/// Applies personality flavor to a finished reply.
///
/// Transforms run in a fixed order so output is stable regardless of tag
/// order in the persona: "playful" first, then "supportive".
pub fn apply_personality(reply: &str, tags: &[String]) -> String {
    let mut out = reply.to_string();

    if has_tag(tags, "playful") {
        out.push_str(" 😊");
    }
    if has_tag(tags, "supportive") {
        out.push_str(" Remember, I'm always here for you.");
    }

    out
}

fn has_tag(tags: &[String], wanted: &str) -> bool {
    tags.iter().any(|t| t.eq_ignore_ascii_case(wanted))
}
