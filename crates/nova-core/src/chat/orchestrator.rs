//! One chat turn, end to end.
//!
//! A turn moves through `Idle -> AwaitingBackend -> Replied -> Saving -> Idle`.
//! The caller gets the reply as soon as the backend answers; the save runs
//! on the user's lane in the [`SaveQueue`] and its outcome is never reported
//! back. A crash between reply and save loses that turn.

use std::sync::Arc;

use nova_types::chat::{ChatMessage, TurnOutcome};
use nova_types::error::ChatError;
use nova_types::llm::{BackendStatus, CompletionRequest};
use tracing::{debug, info, warn};

use crate::chat::repository::ConversationRepository;
use crate::chat::save_queue::SaveQueue;
use crate::llm::gateway::InferenceGateway;
use crate::llm::health::BackendHealth;

/// Coordinates validation, the backend call, and the deferred save.
pub struct ChatOrchestrator<G: InferenceGateway, C: ConversationRepository + 'static> {
    gateway: Arc<G>,
    saves: SaveQueue<C>,
    health: BackendHealth,
}

impl<G: InferenceGateway, C: ConversationRepository + 'static> ChatOrchestrator<G, C> {
    pub fn new(gateway: Arc<G>, saves: SaveQueue<C>, health: BackendHealth) -> Self {
        Self {
            gateway,
            saves,
            health,
        }
    }

    pub fn save_queue(&self) -> &SaveQueue<C> {
        &self.saves
    }

    pub fn health(&self) -> &BackendHealth {
        &self.health
    }

    /// Probe the backend and record the result.
    pub async fn probe(&self) -> BackendStatus {
        let status = self.gateway.probe().await;
        self.health.record(status);
        status
    }

    /// Relay `message` with `prior` history to the backend.
    ///
    /// On success the returned history is `prior ++ [user, assistant]` and a
    /// save of exactly that history has been queued. On any error nothing is
    /// queued and `prior` is untouched.
    pub async fn handle_turn(
        &self,
        user_id: i64,
        username: &str,
        message: &str,
        prior: Vec<ChatMessage>,
    ) -> Result<TurnOutcome, ChatError> {
        if username.trim().is_empty() || message.trim().is_empty() {
            return Err(ChatError::Validation(
                "Username and message are required".to_string(),
            ));
        }

        if self.probe().await == BackendStatus::Offline {
            warn!(user_id, "Inference backend offline, rejecting turn");
            return Err(ChatError::BackendOffline);
        }

        let user_message = ChatMessage::user(message);
        let mut outbound = prior;
        outbound.push(user_message);
        let request = CompletionRequest::new(outbound);

        debug!(user_id, messages = request.messages.len(), "Relaying turn");
        let outcome = self.gateway.complete(&request).await;
        self.health.record_outcome(&outcome);
        let response = outcome.map_err(|e| {
            warn!(user_id, error = %e, "Completion failed");
            ChatError::from(e)
        })?;

        let mut history = request.messages;
        history.push(ChatMessage::assistant(response.content.clone()));

        info!(
            user_id,
            username,
            history_len = history.len(),
            model = response.model.as_deref().unwrap_or("unknown"),
            "Turn completed"
        );

        self.saves.enqueue(user_id, history.clone());

        Ok(TurnOutcome {
            reply: response.content,
            history,
        })
    }
}
