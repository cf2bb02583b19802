//! OpenAI-based brain implementation.
//!
//! This crate provides a [`Brain`] that talks to any OpenAI-compatible
//! chat-completions API.
//!
//! # Features
//!
//! - Stateless: the caller supplies the full directive-prefixed window
//! - Per-request model selection (the gateway's active model)
//! - Model listing via `/v1/models`
//! - Configurable via environment variables
//!
//! # Usage
//!
//! ```rust,no_run
//! use openai_brain::OpenAiBrain;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let brain = OpenAiBrain::from_env()?;
//!     // Use the brain...
//!     Ok(())
//! }
//! ```

mod api_types;
mod brain;
mod config;

pub use brain::OpenAiBrain;
pub use config::{OpenAiBrainConfig, OpenAiBrainConfigBuilder};

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, Brain, BrainError, CompletionRequest, HistoryMessage};
