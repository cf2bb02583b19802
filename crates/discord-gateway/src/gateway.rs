//! Gateway websocket client for receiving messages.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::stream::Stream;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::client::DiscordClient;
use crate::error::GatewayError;
use crate::types::{intents, opcode, GatewayPayload, Hello, MessageCreate, Ready};

/// Configuration for automatic reconnection.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Maximum number of retries (None = infinite).
    pub max_retries: Option<u32>,
    /// Initial delay before first retry.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Backoff multiplier for each retry.
    pub backoff_multiplier: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_retries: None,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            backoff_multiplier: 2.0,
        }
    }
}

impl ReconnectConfig {
    /// Calculate delay for a given attempt number.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay_ms = self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi(attempt as i32);
        let delay = Duration::from_millis(delay_ms as u64);
        delay.min(self.max_delay)
    }

    /// Check if we should retry after the given number of attempts.
    pub fn should_retry(&self, attempts: u32) -> bool {
        self.max_retries.map_or(true, |max| attempts < max)
    }
}

/// A stream of `MESSAGE_CREATE` events from the gateway.
///
/// The session runs on a background task that reconnects on failure.
/// Dropping the stream ends the session.
pub struct MessageStream {
    rx: mpsc::Receiver<Result<MessageCreate, GatewayError>>,
}

impl Stream for MessageStream {
    type Item = Result<MessageCreate, GatewayError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

/// Open a gateway session with default reconnection.
pub fn subscribe(client: &DiscordClient) -> MessageStream {
    subscribe_with_reconnect(client, ReconnectConfig::default())
}

/// Open a gateway session with custom reconnection configuration.
pub fn subscribe_with_reconnect(
    client: &DiscordClient,
    reconnect_config: ReconnectConfig,
) -> MessageStream {
    let (tx, rx) = mpsc::channel(64);
    let client = client.clone();
    tokio::spawn(run_gateway(client, reconnect_config, tx));
    MessageStream { rx }
}

/// How a session ended.
enum SessionEnd {
    /// The consumer dropped the stream.
    Closed,
    /// The session must be re-established.
    Reconnect { identified: bool, reason: String },
}

async fn run_gateway(
    client: DiscordClient,
    reconnect: ReconnectConfig,
    tx: mpsc::Sender<Result<MessageCreate, GatewayError>>,
) {
    let mut attempts = 0u32;

    loop {
        match run_session(&client, &tx).await {
            Ok(SessionEnd::Closed) => {
                info!("Gateway stream dropped, closing session");
                return;
            }
            Ok(SessionEnd::Reconnect { identified, reason }) => {
                if identified {
                    attempts = 0;
                }
                warn!("Gateway session ended: {}", reason);
            }
            Err(e) => {
                error!("Gateway session failed: {}", e);
                if tx.send(Err(e)).await.is_err() {
                    return;
                }
            }
        }

        if !reconnect.should_retry(attempts) {
            error!("Giving up on gateway after {} attempts", attempts);
            let _ = tx
                .send(Err(GatewayError::Connection("retries exhausted".to_string())))
                .await;
            return;
        }

        let delay = reconnect.delay_for_attempt(attempts);
        attempts += 1;
        info!("Reconnecting to gateway in {:?} (attempt {})", delay, attempts);
        tokio::time::sleep(delay).await;
    }
}

async fn run_session(
    client: &DiscordClient,
    tx: &mpsc::Sender<Result<MessageCreate, GatewayError>>,
) -> Result<SessionEnd, GatewayError> {
    let url = client.gateway_url().await?;
    info!("Connecting to gateway at {}", url);

    let (socket, _) = tokio_tungstenite::connect_async(url.as_str()).await?;
    let (mut write, mut read) = socket.split();

    let hello = match read.next().await {
        Some(Ok(Message::Text(text))) => serde_json::from_str::<GatewayPayload>(&text)?,
        Some(Ok(other)) => {
            return Err(GatewayError::Connection(format!("unexpected first frame: {:?}", other)))
        }
        Some(Err(e)) => return Err(e.into()),
        None => return Err(GatewayError::Connection("closed before hello".to_string())),
    };
    if hello.op != opcode::HELLO {
        return Err(GatewayError::Connection(format!("expected hello, got op {}", hello.op)));
    }
    let Hello { heartbeat_interval } = serde_json::from_value(hello.d)?;
    debug!("Heartbeat interval: {}ms", heartbeat_interval);

    let identify = GatewayPayload::identify(&client.config().token, intents::DEFAULT);
    write.send(Message::Text(identify.to_string())).await?;

    let period = Duration::from_millis(heartbeat_interval.max(1));
    let mut heartbeat = interval_at(Instant::now() + period, period);
    let mut last_sequence: Option<u64> = None;
    let mut identified = false;

    loop {
        tokio::select! {
            _ = heartbeat.tick() => {
                let frame = GatewayPayload::heartbeat(last_sequence);
                write.send(Message::Text(frame.to_string())).await?;
            }
            frame = read.next() => {
                let text = match frame {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(close))) => {
                        return Ok(SessionEnd::Reconnect {
                            identified,
                            reason: format!("closed by server: {:?}", close),
                        });
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => return Err(e.into()),
                    None => {
                        return Ok(SessionEnd::Reconnect {
                            identified,
                            reason: "websocket closed".to_string(),
                        });
                    }
                };

                let payload: GatewayPayload = match serde_json::from_str(&text) {
                    Ok(payload) => payload,
                    Err(e) => {
                        warn!("Failed to parse gateway frame: {}", e);
                        continue;
                    }
                };

                if payload.s.is_some() {
                    last_sequence = payload.s;
                }

                match payload.op {
                    opcode::DISPATCH => {
                        if payload.is_dispatch("READY") {
                            identified = true;
                            on_ready(client, payload.d);
                        } else if payload.is_dispatch("MESSAGE_CREATE") {
                            match serde_json::from_value::<MessageCreate>(payload.d) {
                                Ok(message) => {
                                    if tx.send(Ok(message)).await.is_err() {
                                        return Ok(SessionEnd::Closed);
                                    }
                                }
                                Err(e) => warn!("Failed to parse MESSAGE_CREATE: {}", e),
                            }
                        }
                    }
                    opcode::HEARTBEAT => {
                        let frame = GatewayPayload::heartbeat(last_sequence);
                        write.send(Message::Text(frame.to_string())).await?;
                    }
                    opcode::HEARTBEAT_ACK => debug!("Heartbeat acknowledged"),
                    opcode::RECONNECT => {
                        return Ok(SessionEnd::Reconnect {
                            identified,
                            reason: "server requested reconnect".to_string(),
                        });
                    }
                    opcode::INVALID_SESSION => {
                        return Ok(SessionEnd::Reconnect {
                            identified,
                            reason: "invalid session".to_string(),
                        });
                    }
                    other => debug!("Ignoring gateway op {}", other),
                }
            }
        }
    }
}

fn on_ready(client: &DiscordClient, data: Value) {
    match serde_json::from_value::<Ready>(data) {
        Ok(ready) => {
            info!(
                "Gateway ready as {} (ID: {}, session {})",
                ready.user.username, ready.user.id, ready.session_id
            );
            client.set_bot_user(ready.user);
        }
        Err(e) => warn!("Failed to parse READY: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconnect_backoff() {
        let config = ReconnectConfig::default();
        assert_eq!(config.delay_for_attempt(0), Duration::from_secs(1));
        assert_eq!(config.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(config.delay_for_attempt(3), Duration::from_secs(8));
        assert_eq!(config.delay_for_attempt(10), Duration::from_secs(60));
    }

    #[test]
    fn test_should_retry() {
        assert!(ReconnectConfig::default().should_retry(1_000));

        let limited = ReconnectConfig {
            max_retries: Some(2),
            ..Default::default()
        };
        assert!(limited.should_retry(1));
        assert!(!limited.should_retry(2));
    }

    #[tokio::test]
    async fn test_stream_reports_unreachable_gateway() {
        let config = crate::GatewayConfig::new("tok").with_api_url("http://127.0.0.1:9");
        let client = DiscordClient::new(config).unwrap();
        let reconnect = ReconnectConfig {
            max_retries: Some(0),
            ..Default::default()
        };

        let mut stream = subscribe_with_reconnect(&client, reconnect);
        assert!(matches!(stream.next().await, Some(Err(GatewayError::Http(_)))));
        assert!(matches!(stream.next().await, Some(Err(GatewayError::Connection(_)))));
        assert!(stream.next().await.is_none());
    }
}
