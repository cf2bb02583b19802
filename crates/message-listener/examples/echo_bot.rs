//! Echo bot example using MessageProcessor.
//!
//! Replies to every message with its own text, and supports all the
//! regular commands. No AI provider is needed.
//!
//! Run with: cargo run -p message-listener --features signal --example echo_bot
//!
//! Configuration via .env file or environment variables:
//!   DISCORD_TOKEN  - Bot token (required)
//!   BOTTY_DATA_DIR - Where state is kept (default: data)

use std::env;
use std::sync::Arc;

use discord_gateway::{DiscordClient, GatewayConfig};
use json_store::JsonStore;
use message_listener::{DiscordSender, MessageProcessor};
use mock_brain::EchoBrain;
use orchestrator::{Orchestrator, OrchestratorConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present (searches current dir and parents)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let client = DiscordClient::connect(GatewayConfig::from_env()?).await?;
    let data_dir = env::var("BOTTY_DATA_DIR").unwrap_or_else(|_| "data".to_string());
    let store = JsonStore::open(&data_dir).await?;

    let orchestrator = Orchestrator::load(
        EchoBrain::with_prefix("Echo: "),
        DiscordSender::new(client.clone()).with_typing(true),
        store,
        OrchestratorConfig::default(),
    )
    .await;

    println!("Echo bot is running! Press Ctrl+C to stop.");

    MessageProcessor::with_defaults(client, Arc::new(orchestrator))
        .run_until_stopped()
        .await?;

    Ok(())
}
