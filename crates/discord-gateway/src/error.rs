//! Error types for discord-gateway.

use thiserror::Error;

/// Errors that can occur when talking to Discord.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-success response from the REST API.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Websocket transport failure.
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Gateway session ended or misbehaved.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for GatewayError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        GatewayError::WebSocket(e.to_string())
    }
}
