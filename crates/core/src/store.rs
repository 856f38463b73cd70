//! HistoryStore trait — the durable, append-only turn log.
//!
//! The store exclusively owns the turn log. The context assembler only reads
//! it; the orchestrator is the sole writer.

use crate::error::StorageError;
use crate::turn::{ConversationId, Role, Turn};
use async_trait::async_trait;

/// The core HistoryStore trait.
///
/// Implementations: SQLite (production), in-memory (tests).
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// The backend name (e.g., "sqlite", "in_memory").
    fn name(&self) -> &str;

    /// Durably record one new turn with a fresh timestamp and return it.
    async fn append(
        &self,
        conversation_id: &ConversationId,
        role: Role,
        content: &str,
    ) -> std::result::Result<Turn, StorageError>;

    /// All turns for the conversation in chronological order.
    ///
    /// A conversation the store has never seen lists as empty, never as an
    /// error.
    async fn list_turns(
        &self,
        conversation_id: &ConversationId,
    ) -> std::result::Result<Vec<Turn>, StorageError>;

    /// Delete every turn in the conversation. Idempotent: clearing an
    /// already-empty conversation returns zero.
    async fn clear(
        &self,
        conversation_id: &ConversationId,
    ) -> std::result::Result<u64, StorageError>;

    /// Number of turns currently stored for the conversation.
    async fn count(
        &self,
        conversation_id: &ConversationId,
    ) -> std::result::Result<u64, StorageError>;
}
