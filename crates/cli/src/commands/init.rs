//! `textline init` — Write a default config file.

use std::path::Path;
use textline_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new("textline.toml");

    if path.exists() {
        println!("textline.toml already exists — leaving it untouched");
        return Ok(());
    }

    std::fs::write(path, AppConfig::default_toml())?;
    println!("Wrote default config to textline.toml");
    println!("Set your API key via TEXTLINE_API_KEY or the api_key field before serving.");

    Ok(())
}
