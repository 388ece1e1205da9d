// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reply-generation pipeline for the Amiko chat backend.
//!
//! The pipeline turns a [`amiko_core::ReplyRequest`] into a finished reply:
//! prompt construction, provider fallback with a single echo retry per
//! variant, a local rule-based fallback, personality post-processing, the
//! safety gate in safe mode, and output sanitization.

pub mod local;
pub mod moderation;
pub mod personality;
pub mod pipeline;
pub mod prompt;
pub mod sanitize;

pub use local::local_reply;
pub use moderation::{DenylistGate, SafetyGate, BLOCKED_REPLACEMENT, DEFAULT_DENYLIST};
pub use personality::apply_personality;
pub use pipeline::{is_echo, PipelineOptions, ReplyPipeline};
pub use prompt::{build_prompt, build_retry_prompt};
pub use sanitize::sanitize;
