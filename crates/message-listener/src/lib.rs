//! Message listener utilities for Botty.
//!
//! This crate wires the Discord gateway to the orchestrator:
//!
//! - [`MessageProcessor`] turns each message into an orchestrator turn,
//!   resolving administrator rights, and drives the scheduler tick
//! - [`DiscordSender`] posts orchestrator output back to Discord
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use discord_gateway::{DiscordClient, GatewayConfig};
//! use json_store::JsonStore;
//! use message_listener::{DiscordSender, MessageProcessor};
//! use mock_brain::EchoBrain;
//! use orchestrator::{Orchestrator, OrchestratorConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = DiscordClient::connect(GatewayConfig::from_env()?).await?;
//! let orchestrator = Orchestrator::load(
//!     EchoBrain::new(),
//!     DiscordSender::new(client.clone()),
//!     JsonStore::open("data").await?,
//!     OrchestratorConfig::default(),
//! )
//! .await;
//!
//! let processor = MessageProcessor::with_defaults(client, Arc::new(orchestrator));
//! // Stop after an hour.
//! processor
//!     .run_with_shutdown(tokio::time::sleep(Duration::from_secs(3600)))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod processor;
mod sender;

pub use discord_gateway::{MessageCreate, ReconnectConfig};
pub use processor::{
    to_inbound, DiscordOrchestrator, MessageProcessor, ProcessResult, ProcessorConfig,
    ProcessorError, DEFAULT_TICK_INTERVAL,
};
pub use sender::DiscordSender;
