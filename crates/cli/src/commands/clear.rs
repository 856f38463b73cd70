//! `textline clear` — Wipe a conversation's history.

use super::open_store;
use textline_config::AppConfig;
use textline_core::store::HistoryStore;
use textline_core::turn::ConversationId;

pub async fn run(conversation: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let store = open_store(&config).await?;

    let conversation_id = ConversationId::from(conversation);
    let deleted = store.clear(&conversation_id).await?;

    println!("Deleted {deleted} turns from conversation '{conversation}'");
    Ok(())
}
