// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider trait for text-generation backends.

use async_trait::async_trait;

use crate::error::AmikoError;

/// One concrete way of turning a prompt into generated text.
///
/// The reply pipeline holds provider handles as `Option<Arc<dyn
/// TextProvider>>` injected by the caller; variants are tried in the
/// pipeline's fallback order. Implementations must return
/// [`AmikoError::Provider`] on exhaustion rather than panicking -- the
/// pipeline treats any error as a soft failure of that variant.
#[async_trait]
pub trait TextProvider: Send + Sync + 'static {
    /// Human-readable variant name, used in logs.
    fn name(&self) -> &str;

    /// Generates text for the given prompt.
    async fn generate(&self, prompt: &str) -> Result<String, AmikoError>;
}
