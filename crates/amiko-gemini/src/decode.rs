// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response-shape normalization for heterogeneous Gemini payloads.
//!
//! Generative Language API deployments return text under several shapes
//! (direct text fields, nested candidate/content/part trees, generic output
//! arrays). Rather than probing properties ad hoc, this module keeps an
//! explicit ordered list of shape matchers; the first matcher producing
//! non-empty text wins. When no shape matches, the raw payload is returned
//! JSON-stringified and capped, never an error.

use serde_json::Value;

/// Maximum length of the stringified-payload fallback.
const FALLBACK_CAP: usize = 2000;

/// Ordered decision table of response-shape matchers.
///
/// Order matters: direct text fields first, then candidate trees, then
/// generic output arrays.
const SHAPE_MATCHERS: &[fn(&Value) -> Option<String>] = &[
    match_direct_text,
    match_candidate_parts,
    match_candidate_text,
    match_output_array,
];

/// Normalizes a provider response payload into plain text.
///
/// Falls back to a bounded JSON stringification when no known shape matches.
pub fn decode_response(payload: &Value) -> String {
    for matcher in SHAPE_MATCHERS {
        if let Some(text) = matcher(payload) {
            return text;
        }
    }
    truncate_chars(&payload.to_string(), FALLBACK_CAP)
}

/// Top-level `text`, `outputText`, `output_text`, or `response` string fields.
fn match_direct_text(payload: &Value) -> Option<String> {
    for key in ["text", "outputText", "output_text", "response"] {
        if let Some(text) = payload.get(key).and_then(Value::as_str)
            && !text.is_empty()
        {
            return Some(text.to_string());
        }
    }
    None
}

/// `candidates[0].content.parts[0].text`, where `content` is either an
/// object with `parts` or an array of content items each carrying `parts`.
fn match_candidate_parts(payload: &Value) -> Option<String> {
    let candidate = payload.get("candidates")?.as_array()?.first()?;
    let content = candidate.get("content")?;

    if let Some(text) = first_part_text(content) {
        return Some(text);
    }

    if let Some(items) = content.as_array() {
        for item in items {
            if let Some(text) = first_part_text(item) {
                return Some(text);
            }
        }
    }

    None
}

/// `candidates[0].text` or `candidates[0].output_text` fallbacks.
fn match_candidate_text(payload: &Value) -> Option<String> {
    let candidate = payload.get("candidates")?.as_array()?.first()?;
    for key in ["text", "output_text"] {
        if let Some(text) = candidate.get(key).and_then(Value::as_str)
            && !text.is_empty()
        {
            return Some(text.to_string());
        }
    }
    None
}

/// Generic `output` array: items carrying `content` arrays of text parts or
/// plain strings. Collected parts are newline-joined.
fn match_output_array(payload: &Value) -> Option<String> {
    let output = payload.get("output")?.as_array()?;
    let mut parts = Vec::new();

    for item in output {
        if let Some(content) = item.get("content").and_then(Value::as_array) {
            for c in content {
                if let Some(text) = c.as_str() {
                    parts.push(text.to_string());
                } else if let Some(text) = c.get("text").and_then(Value::as_str) {
                    parts.push(text.to_string());
                }
            }
        } else if let Some(text) = item.as_str() {
            parts.push(text.to_string());
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n"))
    }
}

/// Extracts the first non-empty `parts[].text` from a content object.
fn first_part_text(content: &Value) -> Option<String> {
    let parts = content.get("parts")?.as_array()?;
    for part in parts {
        if let Some(text) = part.get("text").and_then(Value::as_str)
            && !text.is_empty()
        {
            return Some(text.to_string());
        }
    }
    None
}

/// Truncates a string to at most `max` characters on a char boundary.
fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
