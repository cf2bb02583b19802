//! Message processor that connects the Discord gateway to the orchestrator.

use std::sync::Arc;
use std::time::Duration;

use brain_core::{Brain, InboundMessage};
use discord_gateway::{DiscordClient, GatewayError, MessageCreate, ReconnectConfig};
use futures::StreamExt;
use orchestrator::{Orchestrator, OrchestratorError};
use thiserror::Error;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::sender::DiscordSender;

/// Default period between scheduler ticks (60 seconds).
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(60);

/// The orchestrator type the processor drives.
pub type DiscordOrchestrator<B> = Orchestrator<B, DiscordSender>;

/// Configuration for the message processor.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Whether to process messages posted in guild channels.
    pub process_guilds: bool,

    /// Whether to process direct messages.
    pub process_direct: bool,

    /// Period between scheduler ticks.
    pub tick_interval: Duration,

    /// Reconnection policy for the gateway session.
    pub reconnect: ReconnectConfig,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            process_guilds: true,
            process_direct: true,
            tick_interval: DEFAULT_TICK_INTERVAL,
            reconnect: ReconnectConfig::default(),
        }
    }
}

/// Errors that can occur during message processing.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// Error from the Discord client or gateway.
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Error from the orchestrator.
    #[error("orchestrator error: {0}")]
    Orchestrator(#[from] OrchestratorError),

    /// The message stream ended unexpectedly.
    #[error("message stream ended")]
    StreamEnded,
}

/// Result of processing a single message.
#[derive(Debug)]
pub enum ProcessResult {
    /// Message was processed and a reply sent.
    Responded { channel_id: String, author_id: String },
    /// Message was skipped (e.g., from a bot, or autoreply is off).
    Skipped { reason: String },
    /// Error occurred during processing.
    Error(ProcessorError),
}

/// Convert a gateway message into an orchestrator message.
///
/// Messages from bots, including this one, are rejected. Mentions of the
/// bot are stripped from the text and recorded in `mentions_bot`. The
/// administrator flag is left unset.
pub fn to_inbound(
    message: &MessageCreate,
    bot_user_id: Option<&str>,
) -> Result<InboundMessage, String> {
    if message.author.bot {
        return Err("message from a bot".to_string());
    }
    if bot_user_id == Some(message.author.id.as_str()) {
        return Err("message from self".to_string());
    }

    let mut text = message.content.clone();
    let mut mentions_bot = false;
    if let Some(bot_id) = bot_user_id {
        for tag in [format!("<@{}>", bot_id), format!("<@!{}>", bot_id)] {
            if text.contains(&tag) {
                mentions_bot = true;
                text = text.replace(&tag, "");
            }
        }
        mentions_bot |= message.mentions_user(bot_id);
    }

    let text = text.trim();
    if text.is_empty() {
        return Err("no text content".to_string());
    }

    let mut inbound = InboundMessage::direct(
        message.author.id.as_str(),
        message.channel_id.as_str(),
        text,
        message.created_at_millis(),
    );
    inbound.guild_id = message.guild_id.clone();
    inbound.mentions_bot = mentions_bot;
    Ok(inbound)
}

/// A message processor that receives Discord messages and hands them to
/// the orchestrator, and drives the orchestrator's scheduler tick.
pub struct MessageProcessor<B: Brain + 'static> {
    client: DiscordClient,
    orchestrator: Arc<DiscordOrchestrator<B>>,
    config: ProcessorConfig,
}

impl<B: Brain + 'static> Clone for MessageProcessor<B> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            orchestrator: Arc::clone(&self.orchestrator),
            config: self.config.clone(),
        }
    }
}

impl<B: Brain + 'static> MessageProcessor<B> {
    /// Create a new message processor.
    pub fn new(
        client: DiscordClient,
        orchestrator: Arc<DiscordOrchestrator<B>>,
        config: ProcessorConfig,
    ) -> Self {
        Self {
            client,
            orchestrator,
            config,
        }
    }

    /// Create a processor with default configuration.
    pub fn with_defaults(client: DiscordClient, orchestrator: Arc<DiscordOrchestrator<B>>) -> Self {
        Self::new(client, orchestrator, ProcessorConfig::default())
    }

    /// Get a reference to the orchestrator.
    pub fn orchestrator(&self) -> &DiscordOrchestrator<B> {
        &self.orchestrator
    }

    /// Get a reference to the client.
    pub fn client(&self) -> &DiscordClient {
        &self.client
    }

    /// Check if we should process this message.
    fn should_process(&self, message: &MessageCreate) -> Result<(), String> {
        let is_guild = message.guild_id.is_some();
        if is_guild && !self.config.process_guilds {
            return Err("guild messages disabled".to_string());
        }
        if !is_guild && !self.config.process_direct {
            return Err("direct messages disabled".to_string());
        }
        Ok(())
    }

    /// Process a single message and return the result.
    pub async fn process_message(&self, message: MessageCreate) -> ProcessResult {
        if let Err(reason) = self.should_process(&message) {
            debug!("Skipping message: {}", reason);
            return ProcessResult::Skipped { reason };
        }

        let mut inbound = match to_inbound(&message, self.client.bot_user_id()) {
            Ok(inbound) => inbound,
            Err(reason) => {
                debug!("Skipping message: {}", reason);
                return ProcessResult::Skipped { reason };
            }
        };

        inbound.is_admin = match self
            .client
            .is_administrator(
                message.guild_id.as_deref(),
                &message.author.id,
                message.member_roles(),
            )
            .await
        {
            Ok(is_admin) => is_admin,
            Err(e) => {
                warn!("Could not resolve permissions for {}: {}", message.author.id, e);
                false
            }
        };

        info!(
            channel_id = %inbound.channel_id,
            "Processing message from {} ({} chars)",
            inbound.author_id,
            inbound.text.chars().count()
        );

        let channel_id = inbound.channel_id.clone();
        let author_id = inbound.author_id.clone();
        match self.orchestrator.handle(inbound).await {
            Ok(()) => ProcessResult::Responded {
                channel_id,
                author_id,
            },
            Err(OrchestratorError::Skipped(reason)) => ProcessResult::Skipped { reason },
            Err(e) => ProcessResult::Error(e.into()),
        }
    }

    /// Run the processor with graceful shutdown support.
    ///
    /// Each message is handled on its own task. The scheduler ticks every
    /// `tick_interval`; a tick that would overlap a running one is skipped
    /// by the orchestrator. On shutdown all state is flushed.
    pub async fn run_with_shutdown<S>(self, shutdown_signal: S) -> Result<(), ProcessorError>
    where
        S: std::future::Future<Output = ()> + Send,
    {
        info!(
            "Starting message processor with brain: {} (ticking every {:?})",
            self.orchestrator.brain().name(),
            self.config.tick_interval
        );

        let mut stream =
            discord_gateway::subscribe_with_reconnect(&self.client, self.config.reconnect.clone());

        let mut ticker = tokio::time::interval(self.config.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tokio::pin!(shutdown_signal);

        loop {
            tokio::select! {
                biased;

                () = &mut shutdown_signal => {
                    info!("Shutdown signal received, stopping message processor");
                    self.shutdown().await;
                    return Ok(());
                }

                _ = ticker.tick() => {
                    let orchestrator = Arc::clone(&self.orchestrator);
                    tokio::spawn(async move {
                        let report = orchestrator.tick().await;
                        if report.skipped {
                            debug!("Tick skipped, previous tick still running");
                        }
                    });
                }

                result = stream.next() => {
                    match result {
                        Some(Ok(message)) => {
                            let processor = self.clone();
                            tokio::spawn(async move {
                                match processor.process_message(message).await {
                                    ProcessResult::Responded { channel_id, author_id } => {
                                        debug!("Replied to {} in {}", author_id, channel_id);
                                    }
                                    ProcessResult::Skipped { reason } => {
                                        debug!("Skipped: {}", reason);
                                    }
                                    ProcessResult::Error(e) => {
                                        warn!("Error processing message: {}", e);
                                    }
                                }
                            });
                        }
                        Some(Err(e)) => {
                            // Reconnection is handled by the gateway task.
                            error!("Stream error: {}", e);
                        }
                        None => {
                            warn!("Message stream ended");
                            self.shutdown().await;
                            return Err(ProcessorError::StreamEnded);
                        }
                    }
                }
            }
        }
    }

    /// Run the processor until Ctrl+C is pressed.
    #[cfg(feature = "signal")]
    pub async fn run_until_stopped(self) -> Result<(), ProcessorError> {
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        };
        self.run_with_shutdown(shutdown).await
    }

    async fn shutdown(&self) {
        if let Err(e) = self.orchestrator.flush().await {
            error!("Failed to flush state on shutdown: {}", e);
        }
        if let Err(e) = self.orchestrator.brain().shutdown().await {
            warn!("Error during brain shutdown: {}", e);
        }
    }
}
