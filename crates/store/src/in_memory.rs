//! In-memory backend — useful for testing and ephemeral sessions.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use textline_core::error::StorageError;
use textline_core::store::HistoryStore;
use textline_core::turn::{ConversationId, Role, Turn};
use tokio::sync::RwLock;

/// An in-memory store that keeps turns in a Vec.
/// Same contract as the SQLite backend, without persistence.
pub struct InMemoryStore {
    turns: Arc<RwLock<Vec<Turn>>>,
    next_id: AtomicI64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            turns: Arc::new(RwLock::new(Vec::new())),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn append(
        &self,
        conversation_id: &ConversationId,
        role: Role,
        content: &str,
    ) -> Result<Turn, StorageError> {
        let turn = Turn {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            conversation_id: conversation_id.clone(),
            role,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        self.turns.write().await.push(turn.clone());
        Ok(turn)
    }

    async fn list_turns(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<Turn>, StorageError> {
        let turns = self.turns.read().await;
        let mut result: Vec<Turn> = turns
            .iter()
            .filter(|t| &t.conversation_id == conversation_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(result)
    }

    async fn clear(&self, conversation_id: &ConversationId) -> Result<u64, StorageError> {
        let mut turns = self.turns.write().await;
        let len_before = turns.len();
        turns.retain(|t| &t.conversation_id != conversation_id);
        Ok((len_before - turns.len()) as u64)
    }

    async fn count(&self, conversation_id: &ConversationId) -> Result<u64, StorageError> {
        let turns = self.turns.read().await;
        Ok(turns
            .iter()
            .filter(|t| &t.conversation_id == conversation_id)
            .count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conv(id: &str) -> ConversationId {
        ConversationId::from(id)
    }

    #[tokio::test]
    async fn append_and_list() {
        let store = InMemoryStore::new();
        store.append(&conv("c1"), Role::User, "Hi").await.unwrap();
        store
            .append(&conv("c1"), Role::Assistant, "Hello")
            .await
            .unwrap();

        let turns = store.list_turns(&conv("c1")).await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].content, "Hi");
        assert_eq!(turns[1].content, "Hello");
    }

    #[tokio::test]
    async fn ids_are_sequential() {
        let store = InMemoryStore::new();
        let a = store.append(&conv("c1"), Role::User, "a").await.unwrap();
        let b = store.append(&conv("c1"), Role::User, "b").await.unwrap();
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn clear_is_scoped_and_idempotent() {
        let store = InMemoryStore::new();
        store.append(&conv("c1"), Role::User, "x").await.unwrap();
        store.append(&conv("c2"), Role::User, "y").await.unwrap();

        assert_eq!(store.clear(&conv("c1")).await.unwrap(), 1);
        assert_eq!(store.clear(&conv("c1")).await.unwrap(), 0);
        assert_eq!(store.count(&conv("c2")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unknown_conversation_is_empty() {
        let store = InMemoryStore::new();
        assert!(store.list_turns(&conv("nope")).await.unwrap().is_empty());
        assert_eq!(store.count(&conv("nope")).await.unwrap(), 0);
    }
}
