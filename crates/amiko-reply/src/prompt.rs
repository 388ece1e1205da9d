// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic prompt construction from persona, context, and message.
//!
//! Pure functions of their inputs: no I/O, no clocks, no randomness.
//! Identical inputs produce byte-identical prompts.

use amiko_core::{ContextWindow, Persona, TurnOrigin};

/// Builds the full instruction-and-context prompt for one reply computation.
///
/// Layout: instruction preamble (persona, tags, mode, behavioral rules),
/// rendered history oldest first, the current user message, a closing reply
/// cue, and a final anti-echo directive.
pub fn build_prompt(
    persona: &Persona,
    context: &ContextWindow,
    message: &str,
    safe_mode: bool,
) -> String {
    let tags = persona.personality.join(", ");
    let mode = if safe_mode { "safe" } else { "normal" };
    let history = render_history(persona, context);

    let mut prompt = format!(
        "You are an AI friend named {name}.\n\
         Your personality type is: {tags}.\n\
         Rules:\n\
         1. Respond according to your personality in {mode} mode.\n\
         2. Keep responses short to medium length (2-4 sentences); go longer only when the topic needs it.\n\
         3. Never give harmful advice.\n\
         4. Occasionally use emojis to keep your replies lively.\n\
         5. Always reply in the same language and style the user uses.\n\
         6. Stay consistent with your persona and backstory; talk the way a close friend talks.\n",
        name = persona.name,
        tags = tags,
        mode = mode,
    );

    if !persona.backstory.is_empty() {
        prompt.push_str(&format!("\nBackstory: \"{}\"\n", persona.backstory));
    }

    prompt.push_str(&format!(
        "\nPast chat:\n\"{history}\"\n\nUser message: \"{message}\"\n\nReply:"
    ));

    // Anti-echo directive is always the final instruction line.
    prompt.push_str("\nDo NOT repeat the user's exact input back to them.");
    prompt
}

/// Augments a prompt for the single echo retry.
pub fn build_retry_prompt(prompt: &str) -> String {
    format!("DO NOT ECHO THE USER. {prompt}\n\nReply without repeating the user's message:")
}

/// Renders context turns as newline-joined lines, oldest first.
///
/// Friend turns are prefixed with the persona name, user turns with "User".
fn render_history(persona: &Persona, context: &ContextWindow) -> String {
    context
        .turns
        .iter()
        .map(|turn| match turn.origin {
            TurnOrigin::Friend => format!("{}: {}", persona.name, turn.text),
            TurnOrigin::User => format!("User: {}", turn.text),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
