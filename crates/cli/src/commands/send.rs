//! `textline send` — One-shot message from the terminal.

use super::build_orchestrator;
use textline_config::AppConfig;
use textline_core::turn::ConversationId;

pub async fn run(message: &str, conversation: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let orchestrator = build_orchestrator(&config).await?;

    let conversation_id = ConversationId::from(conversation);
    let reply = orchestrator.handle_message(&conversation_id, message).await?;

    println!("{reply}");
    Ok(())
}
