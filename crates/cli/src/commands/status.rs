//! `textline status` — Show store and upstream health.

use super::{build_provider, open_store};
use textline_config::AppConfig;
use textline_core::provider::CompletionProvider;
use textline_core::store::HistoryStore;
use textline_core::turn::ConversationId;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("Textline Status");
    println!("===============");
    println!("Model:     {}", config.model);
    println!("Endpoint:  {}", config.api_url);
    println!("Database:  {}", config.database_path);
    println!("API key:   {}", if config.has_api_key() { "configured" } else { "MISSING" });

    let store = open_store(&config).await?;
    let local = ConversationId::from("local");
    println!("Turns in 'local': {}", store.count(&local).await?);

    if config.has_api_key() {
        let provider = build_provider(&config)?;
        match provider.health_check().await {
            Ok(true) => println!("Upstream:  reachable"),
            Ok(false) => println!("Upstream:  unhealthy response"),
            Err(e) => println!("Upstream:  unreachable ({e})"),
        }
    }

    Ok(())
}
