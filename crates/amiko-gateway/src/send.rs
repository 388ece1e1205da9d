// SPDX-FileCopyrightText: 2026 Amiko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message-send orchestration.
//!
//! One send runs a fixed sequence: persist the user's message, emit it over
//! WebSocket, assemble context, compute the reply, persist the reply, emit
//! it, and patch the pair's memory. Persisting the user's message is the
//! only hard step; everything after reply computation is best-effort and
//! logged on failure, never surfaced to the sender.

use std::sync::Arc;

use amiko_core::{AmikoError, ChatMessage, MemoryBlob, ReplyRequest};
use amiko_reply::ReplyPipeline;
use amiko_storage::queries::{friends, memory, messages};
use amiko_storage::{load_context, Database};
use chrono::Utc;
use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::ws::{message_event, WsSenders};

/// Characters of the AI reply kept as the memory snippet.
const SNIPPET_MAX_CHARS: usize = 200;

/// Both halves of a completed exchange.
#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub user_message: ChatMessage,
    pub ai_message: ChatMessage,
}

/// Chat orchestration service shared by HTTP handlers and WebSocket tasks.
pub struct ChatService {
    db: Database,
    pipeline: ReplyPipeline,
    ws_senders: WsSenders,
    context_turns: usize,
}

impl ChatService {
    pub fn new(db: Database, pipeline: ReplyPipeline, context_turns: usize) -> Self {
        Self {
            db,
            pipeline,
            ws_senders: Arc::new(DashMap::new()),
            context_turns,
        }
    }

    /// The WebSocket sender registry, shared with connection handlers.
    pub fn ws_senders(&self) -> WsSenders {
        Arc::clone(&self.ws_senders)
    }

    /// Database handle for read-side endpoints.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Handles one user message to an AI friend, start to finish.
    pub async fn send_message(
        &self,
        user_id: &str,
        friend_id: &str,
        content: &str,
        safe_mode: bool,
    ) -> Result<SendOutcome, AmikoError> {
        let friend = friends::get_friend(&self.db, friend_id)
            .await?
            .filter(|f| f.owner_id == user_id)
            .ok_or_else(|| AmikoError::Internal(format!("no such friend: {friend_id}")))?;

        let user_message = ChatMessage {
            id: uuid::Uuid::new_v4().to_string(),
            sender_id: user_id.to_string(),
            receiver_id: friend_id.to_string(),
            content: content.to_string(),
            from_ai: false,
            created_at: Utc::now().to_rfc3339(),
        };
        messages::insert_message(&self.db, &user_message).await?;
        self.emit(user_id, &user_message).await;

        let context = load_context(&self.db, user_id, friend_id, self.context_turns).await?;
        let request = ReplyRequest {
            requester_id: user_id.to_string(),
            persona: friend.persona(),
            message: content.to_string(),
            context,
            safe_mode,
        };
        let reply = self.pipeline.compute_reply(&request).await;

        let ai_message = ChatMessage {
            id: uuid::Uuid::new_v4().to_string(),
            sender_id: friend_id.to_string(),
            receiver_id: user_id.to_string(),
            content: reply,
            from_ai: true,
            created_at: Utc::now().to_rfc3339(),
        };

        // Reply delivery wins over bookkeeping: persistence and memory
        // failures are logged, not surfaced.
        let reply_persisted = match messages::insert_message(&self.db, &ai_message).await {
            Ok(()) => true,
            Err(e) => {
                warn!(friend = friend_id, error = %e, "failed to persist AI reply");
                false
            }
        };
        self.emit(user_id, &ai_message).await;

        // The memory snippet tracks the stored reply, so the patch is
        // skipped when the reply never reached storage.
        if reply_persisted {
            let patch = memory_patch(&ai_message.content);
            if let Err(e) = memory::apply_memory_patch(&self.db, user_id, friend_id, patch).await {
                warn!(friend = friend_id, error = %e, "failed to patch memory");
            }
        }

        info!(
            user = user_id,
            friend = friend_id,
            reply_chars = ai_message.content.chars().count(),
            "exchange completed"
        );

        Ok(SendOutcome {
            user_message,
            ai_message,
        })
    }

    /// Emits a message event to the user's live WebSocket connections.
    /// Best-effort: absent or closed connections are skipped.
    async fn emit(&self, user_id: &str, message: &ChatMessage) {
        let event = message_event(message);
        let senders: Vec<mpsc::Sender<String>> = self
            .ws_senders
            .iter()
            .filter(|entry| entry.key().user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect();

        for sender in senders {
            if sender.send(event.clone()).await.is_err() {
                warn!(user = user_id, "dropping closed WebSocket sender");
            }
        }
    }
}

/// Builds the memory patch recorded after each exchange. The snippet is the
/// friend's reply, the last thing said in the conversation.
fn memory_patch(reply_content: &str) -> MemoryBlob {
    let snippet: String = reply_content.chars().take(SNIPPET_MAX_CHARS).collect();
    let mut patch = MemoryBlob::new();
    patch.insert("latestSnippet".to_string(), Value::String(snippet));
    patch.insert(
        "lastInteraction".to_string(),
        Value::String(Utc::now().to_rfc3339()),
    );
    patch
}

#[cfg(test)]
mod tests {
    use super::*;
    use amiko_reply::{DenylistGate, PipelineOptions};
    use amiko_storage::Friend;
    use amiko_test_utils::MockProvider;

    async fn service_with(provider: Option<Arc<MockProvider>>) -> ChatService {
        let db = Database::open_in_memory().await.unwrap();
        friends::create_friend(
            &db,
            &Friend {
                id: "f1".into(),
                owner_id: "u1".into(),
                name: "Aanya".into(),
                personality: vec!["supportive".into()],
                backstory: String::new(),
                created_at: "2026-01-01T00:00:00Z".into(),
            },
        )
        .await
        .unwrap();

        let pipeline = ReplyPipeline::new(
            provider.map(|p| p as Arc<dyn amiko_core::TextProvider>),
            None,
            Arc::new(DenylistGate::default()),
            PipelineOptions::default(),
        );
        ChatService::new(db, pipeline, 10)
    }

    #[tokio::test]
    async fn send_persists_both_messages() {
        let provider = Arc::new(MockProvider::with_responses("mock", vec!["Nice to hear!"]));
        let service = service_with(Some(provider)).await;

        let outcome = service.send_message("u1", "f1", "I got a new job", true).await.unwrap();
        assert!(!outcome.user_message.from_ai);
        assert!(outcome.ai_message.from_ai);
        assert!(outcome.ai_message.content.starts_with("Nice to hear!"));

        let history = messages::history_between(service.db(), "u1", "f1").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "I got a new job");
    }

    #[tokio::test]
    async fn unknown_friend_is_an_error() {
        let service = service_with(None).await;
        let err = service.send_message("u1", "ghost", "hi", true).await.unwrap_err();
        assert!(err.to_string().contains("no such friend"));
    }

    #[tokio::test]
    async fn friend_owned_by_someone_else_is_an_error() {
        let service = service_with(None).await;
        assert!(service.send_message("u2", "f1", "hi", true).await.is_err());
    }

    #[tokio::test]
    async fn memory_patch_records_reply_snippet_and_interaction() {
        let service = service_with(None).await;
        let outcome = service
            .send_message("u1", "f1", "remember the picnic", true)
            .await
            .unwrap();

        let blob = memory::load_memory(service.db(), "u1", "f1").await.unwrap();
        assert_eq!(
            blob.get("latestSnippet"),
            Some(&Value::String(outcome.ai_message.content.clone()))
        );
        assert!(blob.contains_key("lastInteraction"));
        assert!(blob.contains_key("lastUpdated"));
    }

    #[tokio::test]
    async fn memory_patch_skipped_when_reply_persistence_fails() {
        let provider = Arc::new(MockProvider::with_responses("mock", vec!["a fine reply"]));
        let service = service_with(Some(provider)).await;

        // Reject AI rows so the user message persists but the reply does not.
        service
            .db()
            .connection()
            .call(|conn| {
                conn.execute_batch(
                    "CREATE TRIGGER reject_ai_rows BEFORE INSERT ON messages
                     WHEN NEW.from_ai = 1
                     BEGIN SELECT RAISE(ABORT, 'ai rows rejected'); END;",
                )?;
                Ok::<_, rusqlite::Error>(())
            })
            .await
            .unwrap();

        let outcome = service.send_message("u1", "f1", "hello", true).await.unwrap();
        assert!(!outcome.ai_message.content.is_empty());

        let blob = memory::load_memory(service.db(), "u1", "f1").await.unwrap();
        assert!(blob.is_empty());
    }

    #[tokio::test]
    async fn provider_failure_still_produces_reply() {
        let provider = Arc::new(MockProvider::new("mock"));
        provider.push_err("down");
        let service = service_with(Some(provider)).await;

        let outcome = service.send_message("u1", "f1", "hello", true).await.unwrap();
        assert!(!outcome.ai_message.content.is_empty());
    }

    #[tokio::test]
    async fn second_send_includes_prior_turns_in_context() {
        let provider = Arc::new(MockProvider::with_responses(
            "mock",
            vec!["first reply", "second reply"],
        ));
        let service = service_with(Some(provider.clone())).await;

        service.send_message("u1", "f1", "turn one", true).await.unwrap();
        service.send_message("u1", "f1", "turn two", true).await.unwrap();

        let prompts = provider.prompts();
        assert!(prompts[1].contains("User: turn one"));
        assert!(prompts[1].contains("Aanya: first reply"));
    }

    #[tokio::test]
    async fn emit_reaches_registered_ws_connection() {
        let provider = Arc::new(MockProvider::with_responses("mock", vec!["hi back"]));
        let service = service_with(Some(provider)).await;

        let (tx, mut rx) = mpsc::channel(8);
        service.ws_senders().insert(
            crate::ws::WsConnection {
                user_id: "u1".into(),
                connection_id: "c1".into(),
            },
            tx,
        );

        service.send_message("u1", "f1", "ping", true).await.unwrap();

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert!(first.contains("\"ping\""));
        assert!(second.contains("hi back"));
    }
}
