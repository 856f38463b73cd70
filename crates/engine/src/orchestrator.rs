//! Turn orchestration: the request lifecycle for one exchange.
//!
//! `handle_message` drives validate → assemble context → persist user turn →
//! upstream call → persist assistant turn. On upstream failure nothing else
//! is persisted: the user turn stays in the history with no reply, which the
//! next page render makes visible. There are no retries here; retry policy
//! belongs to the caller.
//!
//! Mutations to one conversation's log are serialized through a
//! per-conversation lock, so overlapping requests for the same conversation
//! cannot interleave their appends. Different conversations never contend.

use crate::context::ContextAssembler;
use std::collections::HashMap;
use std::sync::Arc;
use textline_core::error::{Error, Result, ValidationError};
use textline_core::provider::{CompletionProvider, CompletionRequest};
use textline_core::store::HistoryStore;
use textline_core::turn::{ConversationId, Role};
use tokio::sync::Mutex;
use tracing::{error, info};

/// Coordinates the history store, context assembler, and upstream provider
/// for each inbound message.
///
/// Owns its collaborators explicitly: handles are passed in at construction
/// and live as long as the process, with no ambient globals.
pub struct TurnOrchestrator {
    store: Arc<dyn HistoryStore>,
    provider: Arc<dyn CompletionProvider>,
    assembler: ContextAssembler,
    model: String,
    temperature: f32,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl TurnOrchestrator {
    pub fn new(
        store: Arc<dyn HistoryStore>,
        provider: Arc<dyn CompletionProvider>,
        model: impl Into<String>,
    ) -> Self {
        let assembler = ContextAssembler::new(store.clone());
        Self {
            store,
            provider,
            assembler,
            model: model.into(),
            temperature: 0.7,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_context_budget(mut self, budget_tokens: usize) -> Self {
        self.assembler = ContextAssembler::new(self.store.clone()).with_budget(budget_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// The lock guarding one conversation's turn log.
    async fn conversation_lock(&self, conversation_id: &ConversationId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(conversation_id.as_str().to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Handle one inbound user message and return the assistant's reply.
    ///
    /// The user turn is persisted before the upstream call; if that call
    /// fails, the turn remains and the error surfaces to the caller.
    pub async fn handle_message(
        &self,
        conversation_id: &ConversationId,
        user_text: &str,
    ) -> Result<String> {
        if user_text.trim().is_empty() {
            return Err(ValidationError::EmptyMessage.into());
        }

        let lock = self.conversation_lock(conversation_id).await;
        let _guard = lock.lock().await;

        // Assemble from stored history before the append: the new turn is
        // the assembler's final element, and the lock keeps the snapshot
        // consistent with what gets persisted next.
        let context = self
            .assembler
            .build_context(conversation_id, user_text)
            .await?;

        self.store
            .append(conversation_id, Role::User, user_text)
            .await?;

        let request = CompletionRequest::new(&self.model, context)
            .with_temperature(self.temperature);

        let reply = match self.provider.complete(request).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(conversation = %conversation_id, error = %e, "Upstream call failed");
                return Err(Error::Upstream(e));
            }
        };

        let turn = self
            .store
            .append(conversation_id, Role::Assistant, &reply.content)
            .await?;

        info!(
            conversation = %conversation_id,
            model = %reply.model,
            reply_len = turn.content.len(),
            "Exchange completed"
        );

        Ok(turn.content)
    }

    /// Delete every turn in the conversation. Returns the number removed.
    pub async fn clear_history(&self, conversation_id: &ConversationId) -> Result<u64> {
        let lock = self.conversation_lock(conversation_id).await;
        let _guard = lock.lock().await;

        Ok(self.store.clear(conversation_id).await?)
    }
}
