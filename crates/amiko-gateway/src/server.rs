// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use amiko_core::AmikoError;

use crate::auth::{auth_middleware, AuthConfig};
use crate::handlers;
use crate::send::ChatService;
use crate::ws;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Chat orchestration service.
    pub service: Arc<ChatService>,
    /// Authentication configuration.
    pub auth: AuthConfig,
}

/// Gateway server configuration (mirrors GatewayConfig from amiko-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Builds the full gateway router.
pub fn build_router(state: GatewayState) -> Router {
    let public_routes = Router::new().route("/health", get(handlers::get_public_health));

    let api_routes = Router::new()
        .route("/v1/chats/send", post(handlers::post_send))
        .route("/v1/chats/history/{friend_id}", get(handlers::get_history))
        .route(
            "/v1/friends",
            post(handlers::post_friends).get(handlers::get_friends),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ))
        .with_state(state.clone());

    // WebSocket auth happens during the handshake, not via middleware.
    let ws_routes = Router::new()
        .route("/ws/{user_id}", get(ws::ws_handler))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .merge(ws_routes)
        .layer(CorsLayer::permissive())
}

/// Starts the gateway HTTP/WebSocket server and serves until shutdown.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), AmikoError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AmikoError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| AmikoError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use amiko_reply::{DenylistGate, PipelineOptions, ReplyPipeline};
    use amiko_storage::Database;

    async fn test_state() -> GatewayState {
        let db = Database::open_in_memory().await.unwrap();
        let pipeline =
            ReplyPipeline::new(None, None, Arc::new(DenylistGate::default()), PipelineOptions::default());
        GatewayState {
            service: Arc::new(ChatService::new(db, pipeline, 10)),
            auth: AuthConfig {
                bearer_token: Some("secret".into()),
            },
        }
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let _router = build_router(test_state().await);
    }

    #[tokio::test]
    async fn state_is_cheaply_cloneable() {
        let state = test_state().await;
        let clone = state.clone();
        assert!(Arc::ptr_eq(&state.service, &clone.service));
    }
}
