//! Message sender trait and implementations.

use std::sync::Arc;

use async_trait::async_trait;
use brain_core::OutboundMessage;
use tokio::sync::Mutex;

use crate::error::OrchestratorError;

/// Trait for posting messages to channels.
///
/// Abstracted to support different transports (Discord, tests, etc.)
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send a text message.
    ///
    /// # Arguments
    /// * `channel_id` - Destination channel
    /// * `text` - Message content
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<(), OrchestratorError>;

    /// Show or clear a typing indicator.
    ///
    /// Default implementation does nothing.
    async fn set_typing(&self, channel_id: &str, started: bool) -> Result<(), OrchestratorError> {
        let _ = (channel_id, started);
        Ok(())
    }
}

#[async_trait]
impl<T: MessageSender + ?Sized> MessageSender for Arc<T> {
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<(), OrchestratorError> {
        (**self).send_message(channel_id, text).await
    }

    async fn set_typing(&self, channel_id: &str, started: bool) -> Result<(), OrchestratorError> {
        (**self).set_typing(channel_id, started).await
    }
}

/// A no-op message sender for testing that discards all messages.
#[derive(Debug, Clone, Default)]
pub struct NoOpSender;

#[async_trait]
impl MessageSender for NoOpSender {
    async fn send_message(&self, _channel_id: &str, _text: &str) -> Result<(), OrchestratorError> {
        Ok(())
    }
}

/// A logging message sender for debugging that logs all operations.
#[derive(Debug, Clone, Default)]
pub struct LoggingSender;

#[async_trait]
impl MessageSender for LoggingSender {
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<(), OrchestratorError> {
        tracing::info!("Sending message to {}: {}", channel_id, text);
        Ok(())
    }

    async fn set_typing(&self, channel_id: &str, started: bool) -> Result<(), OrchestratorError> {
        let state = if started { "started" } else { "stopped" };
        tracing::info!("Typing {} in {}", state, channel_id);
        Ok(())
    }
}

/// A sender that keeps every message it is asked to send.
///
/// Channels listed as failing reject sends, after recording the attempt.
#[derive(Debug, Clone, Default)]
pub struct RecordingSender {
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    failing_channels: Arc<Vec<String>>,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sends to the given channels fail.
    pub fn failing_for<I, S>(channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sent: Arc::default(),
            failing_channels: Arc::new(channels.into_iter().map(Into::into).collect()),
        }
    }

    /// Messages sent so far, in order.
    pub async fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    /// Messages sent so far to one channel.
    pub async fn sent_to(&self, channel_id: &str) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|m| m.channel_id == channel_id)
            .map(|m| m.text.clone())
            .collect()
    }

    /// Forget everything recorded so far.
    pub async fn clear(&self) {
        self.sent.lock().await.clear();
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<(), OrchestratorError> {
        self.sent
            .lock()
            .await
            .push(OutboundMessage::to_channel(channel_id, text));

        if self.failing_channels.iter().any(|c| c == channel_id) {
            return Err(OrchestratorError::SendFailed(format!(
                "channel {} unreachable",
                channel_id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_sender() {
        let sender = NoOpSender;

        // Should not error
        sender.send_message("123", "test").await.unwrap();
        sender.set_typing("123", true).await.unwrap();
    }

    #[tokio::test]
    async fn test_logging_sender() {
        let sender = LoggingSender;

        // Should not error
        sender.send_message("123", "test").await.unwrap();
        sender.set_typing("123", true).await.unwrap();
        sender.set_typing("123", false).await.unwrap();
    }

    #[tokio::test]
    async fn test_recording_sender() {
        let sender = RecordingSender::failing_for(["bad"]);

        sender.send_message("1", "a").await.unwrap();
        assert!(sender.send_message("bad", "b").await.is_err());
        sender.send_message("1", "c").await.unwrap();

        assert_eq!(sender.sent().await.len(), 3);
        assert_eq!(sender.sent_to("1").await, vec!["a", "c"]);

        sender.clear().await;
        assert!(sender.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_arc_sender_forwards() {
        let inner = Arc::new(RecordingSender::new());
        let shared: Arc<RecordingSender> = Arc::clone(&inner);
        shared.send_message("1", "hi").await.unwrap();
        assert_eq!(inner.sent_to("1").await, vec!["hi"]);
    }
}
