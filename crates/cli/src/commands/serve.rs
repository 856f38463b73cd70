//! `textline serve` — Start the HTTP chat server.

use textline_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.server.port = port;
    }

    if !config.has_api_key() {
        return Err(
            "No API key configured — set TEXTLINE_API_KEY or api_key in textline.toml".into(),
        );
    }

    println!("Textline");
    println!("   Listening: {}:{}", config.server.host, config.server.port);
    println!("   Model:     {}", config.model);
    println!("   Database:  {}", config.database_path);

    textline_gateway::start(config).await?;

    Ok(())
}
