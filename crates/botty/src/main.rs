//! Botty: a Discord chat bot backed by an OpenAI-compatible API.
//!
//! Configuration via .env file or environment variables:
//!   DISCORD_TOKEN           - Bot token (required)
//!   DISCORD_ADMIN_USER_IDS  - Comma-separated user ids always treated as admins
//!   OPENAI_API_KEY          - AI provider key (required)
//!   OPENAI_API_URL          - Provider base URL (default: https://api.openai.com)
//!   BOTTY_*                 - See `BotSettings::from_env`
//!   RUST_LOG                - Log filter (default: info)

mod settings;

use std::path::Path;
use std::sync::Arc;

use brain_core::{prompt_fingerprint, Brain};
use discord_gateway::{DiscordClient, GatewayConfig};
use json_store::JsonStore;
use message_listener::{DiscordSender, MessageProcessor, ProcessorConfig};
use openai_brain::{OpenAiBrain, OpenAiBrainConfig};
use orchestrator::Orchestrator;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::settings::BotSettings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Missing credentials are the only fatal errors.
    let gateway_config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Discord configuration error: {}", e);
            std::process::exit(1);
        }
    };
    let brain_config = match OpenAiBrainConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("AI provider configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let settings = BotSettings::from_env()?;
    info!(
        "Directive fingerprint {} ({} chars)",
        prompt_fingerprint(&settings.directive),
        settings.directive.chars().count()
    );

    let brain = OpenAiBrain::new(brain_config)?;
    info!("Using brain: {}", brain.name());

    let client = DiscordClient::connect(gateway_config).await?;
    let store = open_store(&settings.data_dir).await;

    let orchestrator = Orchestrator::load(
        brain,
        DiscordSender::new(client.clone()).with_typing(true),
        store,
        settings.orchestrator_config(),
    )
    .await;

    let processor_config = ProcessorConfig {
        tick_interval: settings.tick_interval,
        ..Default::default()
    };

    let processor = MessageProcessor::new(client, Arc::new(orchestrator), processor_config);
    processor.run_until_stopped().await?;

    info!("Botty stopped");
    Ok(())
}

/// Open the data directory. If it cannot be created the bot still starts;
/// saves then fail and are logged while in-memory state stays current.
async fn open_store(data_dir: &Path) -> JsonStore {
    match JsonStore::open(data_dir).await {
        Ok(store) => {
            info!("Data directory: {}", store.root().display());
            store
        }
        Err(e) => {
            error!("Data directory unavailable, running without persistence: {}", e);
            JsonStore::new(data_dir)
        }
    }
}
