// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP/WebSocket gateway and message-send orchestration for the Amiko
//! chat backend.
//!
//! The gateway exposes a small REST surface (send, history, friends,
//! health) behind bearer auth, plus a push-only WebSocket channel for live
//! message delivery. The [`send::ChatService`] orchestrator owns the
//! persist/reply/emit sequence.

pub mod auth;
pub mod handlers;
pub mod send;
pub mod server;
pub mod ws;

pub use auth::AuthConfig;
pub use send::{ChatService, SendOutcome};
pub use server::{build_router, start_server, GatewayState, ServerConfig};
