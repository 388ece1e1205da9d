// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebSocket push channel for live message delivery.
//!
//! Clients connect to `GET /ws/{user_id}?token=<bearer token>` and receive
//! message events as the send orchestrator emits them:
//!
//! ```json
//! {"type": "message", "message": {"id": "...", "content": "...", "from_ai": true, ...}}
//! ```
//!
//! The socket is push-only; inbound frames other than close are ignored.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info};

use amiko_core::ChatMessage;

use crate::server::GatewayState;

/// Key identifying one live WebSocket connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WsConnection {
    pub user_id: String,
    pub connection_id: String,
}

/// Registry of live connections, shared between the orchestrator and the
/// socket tasks. A user may hold several connections at once.
pub type WsSenders = Arc<DashMap<WsConnection, mpsc::Sender<String>>>;

/// Serializes a message event for WebSocket delivery.
pub fn message_event(message: &ChatMessage) -> String {
    serde_json::json!({
        "type": "message",
        "message": message,
    })
    .to_string()
}

/// WebSocket upgrade handler.
///
/// Auth happens during the handshake via the `token` query parameter;
/// header-based middleware does not apply to browser WebSocket clients.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(user_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<GatewayState>,
) -> Response {
    if !state.auth.check_token(params.get("token").map(String::as_str)) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    ws.on_upgrade(move |socket| handle_socket(socket, user_id, state))
}

async fn handle_socket(socket: WebSocket, user_id: String, state: GatewayState) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let key = WsConnection {
        user_id: user_id.clone(),
        connection_id: uuid::Uuid::new_v4().to_string(),
    };

    let (tx, mut rx) = mpsc::channel::<String>(64);
    let senders = state.service.ws_senders();
    senders.insert(key.clone(), tx);
    info!(user = user_id.as_str(), "WebSocket connected");

    let sender_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if ws_sender.send(Message::Text(event.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(msg)) = ws_receiver.next().await {
        match msg {
            Message::Close(_) => break,
            other => debug!(user = user_id.as_str(), "ignoring inbound frame: {other:?}"),
        }
    }

    senders.remove(&key);
    sender_task.abort();
    info!(user = user_id.as_str(), "WebSocket disconnected");
}
