// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::error;

use amiko_core::{AmikoError, ChatMessage};
use amiko_storage::queries::{friends, messages};
use amiko_storage::Friend;

use crate::send::SendOutcome;
use crate::server::GatewayState;

fn default_safe_mode() -> bool {
    true
}

/// Request body for POST /v1/chats/send.
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub user_id: String,
    pub friend_id: String,
    pub message: String,
    #[serde(default = "default_safe_mode")]
    pub safe_mode: bool,
}

/// Response body for POST /v1/chats/send.
#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub user_message: ChatMessage,
    pub ai_message: ChatMessage,
}

/// Request body for POST /v1/friends.
#[derive(Debug, Deserialize)]
pub struct CreateFriendRequest {
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub personality: Vec<String>,
    #[serde(default)]
    pub backstory: String,
}

/// Query parameters identifying the calling user.
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct FriendListResponse {
    pub friends: Vec<Friend>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

fn storage_failure(e: AmikoError) -> Response {
    error!(error = %e, "request failed");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
}

/// POST /v1/chats/send
pub async fn post_send(
    State(state): State<GatewayState>,
    Json(body): Json<SendRequest>,
) -> Response {
    if body.message.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "message must not be empty");
    }

    match state
        .service
        .send_message(&body.user_id, &body.friend_id, &body.message, body.safe_mode)
        .await
    {
        Ok(SendOutcome {
            user_message,
            ai_message,
        }) => Json(SendResponse {
            user_message,
            ai_message,
        })
        .into_response(),
        Err(AmikoError::Internal(msg)) if msg.starts_with("no such friend") => {
            error_response(StatusCode::NOT_FOUND, msg)
        }
        Err(e) => storage_failure(e),
    }
}

/// GET /v1/chats/history/{friend_id}?user_id=...
pub async fn get_history(
    State(state): State<GatewayState>,
    Path(friend_id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Response {
    match messages::history_between(state.service.db(), &query.user_id, &friend_id).await {
        Ok(messages) => Json(HistoryResponse { messages }).into_response(),
        Err(e) => storage_failure(e),
    }
}

/// POST /v1/friends
pub async fn post_friends(
    State(state): State<GatewayState>,
    Json(body): Json<CreateFriendRequest>,
) -> Response {
    if body.name.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "name must not be empty");
    }

    let friend = Friend {
        id: uuid::Uuid::new_v4().to_string(),
        owner_id: body.user_id,
        name: body.name,
        personality: body.personality,
        backstory: body.backstory,
        created_at: Utc::now().to_rfc3339(),
    };

    match friends::create_friend(state.service.db(), &friend).await {
        Ok(()) => (StatusCode::CREATED, Json(friend)).into_response(),
        Err(e) => storage_failure(e),
    }
}

/// GET /v1/friends?user_id=...
pub async fn get_friends(
    State(state): State<GatewayState>,
    Query(query): Query<UserQuery>,
) -> Response {
    match friends::list_friends(state.service.db(), &query.user_id).await {
        Ok(friends) => Json(FriendListResponse { friends }).into_response(),
        Err(e) => storage_failure(e),
    }
}

/// GET /health (unauthenticated, for load balancers and systemd)
pub async fn get_public_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
