use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::gate::{GateDecision, GuestGate};
use crate::{ChatTurn, Role};

#[derive(Debug, Clone)]
pub struct Conversation {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub turns: Vec<ChatTurn>,
}

impl Conversation {
    fn new(id: String) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            turns: Vec::new(),
        }
    }

    pub fn user_message_count(&self) -> usize {
        self.turns.iter().filter(|t| t.role == Role::User).count()
    }
}

/// Outcome of [`ConversationStore::admit`].
#[derive(Debug, Clone)]
pub struct Admission {
    pub decision: GateDecision,
    pub history: Vec<ChatTurn>,
}

/// In-memory conversation history, shared across request handlers.
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    inner: Arc<RwLock<HashMap<String, Conversation>>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh conversation id.
    pub fn new_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Snapshot of a conversation, or an empty one when the id is unknown.
    pub async fn get_or_empty(&self, id: &str) -> Conversation {
        self.inner
            .read()
            .await
            .get(id)
            .cloned()
            .unwrap_or_else(|| Conversation::new(id.to_string()))
    }

    /// Check the guest gate and, when allowed, append the user message.
    ///
    /// Both happen under one write lock, so concurrent messages on the same
    /// conversation can never admit more than the gate's limit. The returned
    /// history excludes the admitted message.
    pub async fn admit(
        &self,
        id: &str,
        gate: &GuestGate,
        signed_in: bool,
        message: &str,
    ) -> Admission {
        let mut map = self.inner.write().await;
        let conversation = map
            .entry(id.to_string())
            .or_insert_with(|| Conversation::new(id.to_string()));

        let decision = gate.check(signed_in, conversation.user_message_count());
        let history = conversation.turns.clone();
        if let GateDecision::Allowed { .. } = decision {
            conversation.turns.push(ChatTurn::user(message));
            debug!(conversation = id, turns = conversation.turns.len(), "admitted message");
        }
        Admission { decision, history }
    }

    /// Append the model's reply to an admitted message.
    pub async fn record_reply(&self, id: &str, reply: &str) {
        let mut map = self.inner.write().await;
        let conversation = map
            .entry(id.to_string())
            .or_insert_with(|| Conversation::new(id.to_string()));
        conversation.turns.push(ChatTurn::model(reply));
        debug!(conversation = id, turns = conversation.turns.len(), "recorded reply");
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
