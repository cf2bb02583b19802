//! Orchestrator sender backed by the Discord REST API.

use async_trait::async_trait;
use discord_gateway::DiscordClient;
use orchestrator::{MessageSender, OrchestratorError};
use tracing::debug;

/// Posts orchestrator output to Discord channels.
#[derive(Debug, Clone)]
pub struct DiscordSender {
    client: DiscordClient,
    typing: bool,
}

impl DiscordSender {
    /// Create a sender. Typing indicators are off.
    pub fn new(client: DiscordClient) -> Self {
        Self {
            client,
            typing: false,
        }
    }

    /// Enable or disable typing indicators while a reply is generated.
    pub fn with_typing(mut self, enabled: bool) -> Self {
        self.typing = enabled;
        self
    }

    /// Get the underlying client.
    pub fn client(&self) -> &DiscordClient {
        &self.client
    }
}

#[async_trait]
impl MessageSender for DiscordSender {
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<(), OrchestratorError> {
        let sent = self
            .client
            .send_message(channel_id, text)
            .await
            .map_err(|e| OrchestratorError::SendFailed(e.to_string()))?;
        debug!(channel_id, "Posted message {}", sent.id);
        Ok(())
    }

    async fn set_typing(&self, channel_id: &str, started: bool) -> Result<(), OrchestratorError> {
        // Discord clears the indicator by itself once a message is posted.
        if !self.typing || !started {
            return Ok(());
        }
        self.client
            .trigger_typing(channel_id)
            .await
            .map_err(|e| OrchestratorError::SendFailed(e.to_string()))
    }
}
