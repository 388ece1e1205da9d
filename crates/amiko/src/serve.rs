// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `amiko serve` command implementation.
//!
//! Wires storage, the Gemini providers, the reply pipeline, and the
//! gateway together and serves until the process is stopped.

use std::sync::Arc;

use amiko_config::AmikoConfig;
use amiko_core::AmikoError;
use amiko_gateway::{AuthConfig, ChatService, GatewayState, ServerConfig};
use amiko_gemini::providers_from_config;
use amiko_reply::{DenylistGate, PipelineOptions, ReplyPipeline};
use amiko_storage::Database;
use tracing::{info, warn};

pub async fn run_serve(config: AmikoConfig) -> Result<(), AmikoError> {
    info!(name = config.agent.name.as_str(), "starting amiko");

    let db = Database::open(&config.storage).await?;

    let (primary, fallback) = match providers_from_config(&config.gemini)? {
        Some((primary, fallback)) => (Some(primary), Some(fallback)),
        None => (None, None),
    };

    let gate = Arc::new(DenylistGate::new(config.moderation.denylist.clone()));
    let pipeline = ReplyPipeline::new(
        primary,
        fallback,
        gate,
        PipelineOptions {
            max_reply_chars: config.reply.max_reply_chars,
        },
    );

    let service = Arc::new(ChatService::new(db, pipeline, config.reply.context_turns));

    if !config.gateway.enabled {
        warn!("gateway disabled in configuration, nothing to serve");
        return Ok(());
    }
    if config.gateway.bearer_token.is_none() {
        warn!("no gateway bearer token configured, API requests will be rejected");
    }

    let state = GatewayState {
        service,
        auth: AuthConfig {
            bearer_token: config.gateway.bearer_token.clone(),
        },
    };
    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };

    amiko_gateway::start_server(&server_config, state).await
}
