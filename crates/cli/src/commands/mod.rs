pub mod clear;
pub mod init;
pub mod send;
pub mod serve;
pub mod status;

use std::sync::Arc;
use std::time::Duration;
use textline_config::AppConfig;
use textline_core::store::HistoryStore;
use textline_engine::TurnOrchestrator;
use textline_provider::OpenAiCompatProvider;
use textline_store::SqliteStore;

/// Open the configured store.
pub(crate) async fn open_store(
    config: &AppConfig,
) -> Result<Arc<dyn HistoryStore>, Box<dyn std::error::Error>> {
    Ok(Arc::new(SqliteStore::new(&config.database_path).await?))
}

/// Build the provider, failing fast when no API key is configured.
pub(crate) fn build_provider(
    config: &AppConfig,
) -> Result<Arc<OpenAiCompatProvider>, Box<dyn std::error::Error>> {
    let api_key = config
        .api_key
        .clone()
        .ok_or("No API key configured — set TEXTLINE_API_KEY or api_key in textline.toml")?;

    Ok(Arc::new(OpenAiCompatProvider::new(
        "openai",
        &config.api_url,
        api_key,
        Duration::from_secs(config.request_timeout_secs),
    )))
}

/// Wire a full orchestrator from config.
pub(crate) async fn build_orchestrator(
    config: &AppConfig,
) -> Result<TurnOrchestrator, Box<dyn std::error::Error>> {
    let store = open_store(config).await?;
    let provider = build_provider(config)?;
    Ok(TurnOrchestrator::new(store, provider, &config.model)
        .with_context_budget(config.context_budget_tokens)
        .with_temperature(config.temperature))
}
