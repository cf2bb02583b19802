//! Message orchestrator for Botty.
//!
//! This crate provides the [`Orchestrator`] type, which owns all mutable bot
//! state and turns inbound chat messages and scheduler ticks into outbound
//! messages.
//!
//! # Features
//!
//! - Parses prefix commands (`help`, `admin ...`, `dailyjoke`, `schedule`)
//! - Gates admin commands on the author's administrator capability
//! - Keeps a bounded conversation window per channel, led by the directive
//! - Posts scheduled messages and daily jokes from a periodic tick
//! - Persists settings, schedules and subscriptions as JSON documents
//!
//! # Architecture
//!
//! ```text
//! Inbound message (from message-listener)        Tick (every 60s)
//!          ↓                                             ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ORCHESTRATOR                           │
//! │                                                             │
//! │  command?  → check admin gate → mutate state → persist      │
//! │  chat      → append user turn → snapshot window             │
//! │                 ↓ (lock released)                           │
//! │              brain.complete → append assistant turn         │
//! │  tick      → take due items, reconcile jokes → persist      │
//! │                 ↓ (lock released)                           │
//! │              send each item                                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use brain_core::InboundMessage;
//! use json_store::JsonStore;
//! use mock_brain::EchoBrain;
//! use orchestrator::{LoggingSender, Orchestrator, OrchestratorConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = JsonStore::open("data").await?;
//! let orchestrator =
//!     Orchestrator::load(EchoBrain::new(), LoggingSender, store, OrchestratorConfig::default())
//!         .await;
//!
//! orchestrator
//!     .handle(InboundMessage::direct("user", "channel", "!help", 0))
//!     .await?;
//! orchestrator.tick().await;
//! orchestrator.flush().await?;
//! # Ok(())
//! # }
//! ```

mod commands;
mod config;
mod error;
mod orchestrator;
mod sender;
mod state;

pub use commands::{
    AdminCommand, Command, ScheduleRequest, Toggle, ADMIN_USAGE, DAILYJOKE_USAGE, SCHEDULE_USAGE,
};
pub use config::{
    BotConfig, OrchestratorConfig, OrchestratorConfigBuilder, DEFAULT_COMMAND_PREFIX,
    DEFAULT_DIRECTIVE, DEFAULT_MODEL,
};
pub use error::OrchestratorError;
pub use orchestrator::{
    help_text, Orchestrator, TickReport, AI_ERROR_TEXT, EMPTY_REPLY_TEXT, MAX_LISTED_MODELS,
    PERMISSION_DENIED_TEXT,
};
pub use sender::{LoggingSender, MessageSender, NoOpSender, RecordingSender};
pub use state::{BotState, BOT_CONFIG_FILE, DAILYJOKE_FILE, SCHEDULE_FILE};

// Re-export brain-core types for convenience
pub use brain_core::{InboundMessage, OutboundMessage};
