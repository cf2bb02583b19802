//! Discord client library.
//!
//! This crate provides a Rust client for the parts of Discord a chat bot
//! needs. It supports:
//!
//! - Sending text messages to channels over the REST API
//! - Receiving messages from the gateway websocket, with heartbeats and
//!   automatic reconnection
//! - Resolving whether a user has administrator rights in a guild
//!
//! # Example
//!
//! ```no_run
//! use discord_gateway::{DiscordClient, GatewayConfig};
//!
//! # async fn example() -> Result<(), discord_gateway::GatewayError> {
//! let config = GatewayConfig::from_env()?;
//! let client = DiscordClient::connect(config).await?;
//!
//! use futures::StreamExt;
//! let mut messages = discord_gateway::subscribe(&client);
//! while let Some(result) = messages.next().await {
//!     match result {
//!         Ok(message) => {
//!             client.send_message(&message.channel_id, "Hello!").await?;
//!         }
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod types;

pub use client::{DiscordClient, GUILD_CACHE_TTL};
pub use config::{GatewayConfig, DEFAULT_API_URL};
pub use error::GatewayError;
pub use gateway::{subscribe, subscribe_with_reconnect, MessageStream, ReconnectConfig};
pub use types::*;
