//! Context assembly: which stored turns accompany a new user message.
//!
//! The full history is read from the store and the new user turn appended
//! last. When the result exceeds the token budget, whole turns are dropped
//! from the oldest end until the remainder fits: a contiguous suffix of the
//! conversation, so the model never sees holes in the middle. The newest
//! user turn is always kept, even when it alone exceeds the budget.
//!
//! The policy is a pure function of stored history, new content, and budget:
//! identical inputs assemble identical context on every call.

use crate::token;
use std::sync::Arc;
use textline_core::error::StorageError;
use textline_core::provider::ChatTurn;
use textline_core::store::HistoryStore;
use textline_core::turn::ConversationId;
use tracing::debug;

/// Default token budget for the assembled context.
pub const DEFAULT_BUDGET_TOKENS: usize = 4096;

/// Reads history and produces the ordered context for the upstream call.
pub struct ContextAssembler {
    store: Arc<dyn HistoryStore>,
    budget_tokens: usize,
}

impl ContextAssembler {
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self {
            store,
            budget_tokens: DEFAULT_BUDGET_TOKENS,
        }
    }

    pub fn with_budget(mut self, budget_tokens: usize) -> Self {
        self.budget_tokens = budget_tokens;
        self
    }

    /// Assemble the context for a new user message.
    ///
    /// Returns the stored turns (oldest-first truncation applied) with the
    /// new user turn as the final element.
    pub async fn build_context(
        &self,
        conversation_id: &ConversationId,
        new_user_content: &str,
    ) -> Result<Vec<ChatTurn>, StorageError> {
        let history = self.store.list_turns(conversation_id).await?;

        let mut turns: Vec<ChatTurn> = history.iter().map(ChatTurn::from).collect();
        turns.push(ChatTurn::user(new_user_content));

        let total = turns.len();
        let turns = Self::truncate_oldest_first(turns, self.budget_tokens);

        if turns.len() < total {
            debug!(
                conversation = %conversation_id,
                kept = turns.len(),
                dropped = total - turns.len(),
                "Context over budget, oldest turns dropped"
            );
        }

        Ok(turns)
    }

    /// Keep the largest contiguous suffix that fits the budget.
    ///
    /// Walks newest → oldest accumulating token estimates and stops at the
    /// first turn that would overflow; everything older is dropped. The final
    /// (newest) turn is unconditionally kept.
    fn truncate_oldest_first(turns: Vec<ChatTurn>, budget: usize) -> Vec<ChatTurn> {
        let mut used = 0;
        let mut keep_from = turns.len();

        for (i, turn) in turns.iter().enumerate().rev() {
            let cost = token::estimate_turn_tokens(turn);
            if used + cost > budget && keep_from < turns.len() {
                break;
            }
            used += cost;
            keep_from = i;
        }

        turns[keep_from..].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textline_core::turn::Role;
    use textline_store::InMemoryStore;

    fn conv(id: &str) -> ConversationId {
        ConversationId::from(id)
    }

    async fn seeded_store(pairs: &[(&str, &str)]) -> Arc<InMemoryStore> {
        let store = Arc::new(InMemoryStore::new());
        for (user, assistant) in pairs {
            store.append(&conv("c1"), Role::User, user).await.unwrap();
            store
                .append(&conv("c1"), Role::Assistant, assistant)
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn empty_history_yields_single_user_turn() {
        let store = Arc::new(InMemoryStore::new());
        let assembler = ContextAssembler::new(store);

        let context = assembler.build_context(&conv("c1"), "Hi").await.unwrap();
        assert_eq!(context.len(), 1);
        assert_eq!(context[0], ChatTurn::user("Hi"));
    }

    #[tokio::test]
    async fn history_precedes_new_turn_in_order() {
        let store = seeded_store(&[("Hi", "Hello"), ("How are you?", "Fine")]).await;
        let assembler = ContextAssembler::new(store);

        let context = assembler
            .build_context(&conv("c1"), "Great")
            .await
            .unwrap();

        assert_eq!(context.len(), 5);
        assert_eq!(context[0], ChatTurn::user("Hi"));
        assert_eq!(context[1], ChatTurn::assistant("Hello"));
        assert_eq!(context[4], ChatTurn::user("Great"));
    }

    #[tokio::test]
    async fn assembly_is_deterministic() {
        let store = seeded_store(&[("a", "b"), ("c", "d")]).await;
        let assembler = ContextAssembler::new(store).with_budget(16);

        let first = assembler.build_context(&conv("c1"), "e").await.unwrap();
        let second = assembler.build_context(&conv("c1"), "e").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn oldest_turns_dropped_under_budget_pressure() {
        let store = seeded_store(&[("first question", "first answer"), ("second", "reply")]).await;
        // Each short turn costs ~5-8 tokens; a budget of 20 fits the new turn
        // plus roughly the two newest stored turns.
        let assembler = ContextAssembler::new(store).with_budget(20);

        let context = assembler.build_context(&conv("c1"), "third").await.unwrap();

        assert!(context.len() < 5);
        // Newest turn always last, oldest stored turns gone first
        assert_eq!(context.last().unwrap(), &ChatTurn::user("third"));
        assert_ne!(context[0], ChatTurn::user("first question"));
        // Contiguous suffix: remaining turns are the tail of the full sequence
        let full = [
            ChatTurn::user("first question"),
            ChatTurn::assistant("first answer"),
            ChatTurn::user("second"),
            ChatTurn::assistant("reply"),
            ChatTurn::user("third"),
        ];
        assert_eq!(context.as_slice(), &full[full.len() - context.len()..]);
    }

    #[tokio::test]
    async fn newest_user_turn_survives_tiny_budget() {
        let store = seeded_store(&[("Hi", "Hello")]).await;
        let assembler = ContextAssembler::new(store).with_budget(1);

        let long_message = "x".repeat(400); // ~100 tokens, way over budget
        let context = assembler
            .build_context(&conv("c1"), &long_message)
            .await
            .unwrap();

        assert_eq!(context.len(), 1);
        assert_eq!(context[0].content, long_message);
    }

    #[tokio::test]
    async fn budget_large_enough_keeps_everything() {
        let store = seeded_store(&[("Hi", "Hello")]).await;
        let assembler = ContextAssembler::new(store).with_budget(4096);

        let context = assembler.build_context(&conv("c1"), "More").await.unwrap();
        assert_eq!(context.len(), 3);
    }
}
