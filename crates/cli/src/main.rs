//! Textline CLI — the main entry point.
//!
//! Commands:
//! - `init`   — Write a default textline.toml
//! - `serve`  — Start the HTTP chat server
//! - `send`   — Send a single message from the terminal
//! - `clear`  — Wipe a conversation's history
//! - `status` — Show store and upstream health

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "textline",
    about = "Textline — SMS-style chat relay to an AI completion API",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default textline.toml in the working directory
    Init,

    /// Start the HTTP chat server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Send a single message and print the reply
    Send {
        /// The message text
        #[arg(short, long)]
        message: String,

        /// Conversation to post into
        #[arg(short, long, default_value = "local")]
        conversation: String,
    },

    /// Delete all turns in a conversation
    Clear {
        /// Conversation to clear
        #[arg(short, long, default_value = "local")]
        conversation: String,
    },

    /// Show configuration, store, and upstream health
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init => commands::init::run().await?,
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Send {
            message,
            conversation,
        } => commands::send::run(&message, &conversation).await?,
        Commands::Clear { conversation } => commands::clear::run(&conversation).await?,
        Commands::Status => commands::status::run().await?,
    }

    Ok(())
}
