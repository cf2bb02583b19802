//! Gateway websocket payloads.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::message::User;

/// Gateway opcodes.
pub mod opcode {
    pub const DISPATCH: u8 = 0;
    pub const HEARTBEAT: u8 = 1;
    pub const IDENTIFY: u8 = 2;
    pub const RECONNECT: u8 = 7;
    pub const INVALID_SESSION: u8 = 9;
    pub const HELLO: u8 = 10;
    pub const HEARTBEAT_ACK: u8 = 11;
}

/// Gateway intents.
pub mod intents {
    pub const GUILDS: u64 = 1 << 0;
    pub const GUILD_MESSAGES: u64 = 1 << 9;
    pub const DIRECT_MESSAGES: u64 = 1 << 12;
    pub const MESSAGE_CONTENT: u64 = 1 << 15;

    /// Intents requested on identify.
    pub const DEFAULT: u64 = GUILDS | GUILD_MESSAGES | DIRECT_MESSAGES | MESSAGE_CONTENT;
}

/// A gateway frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayPayload {
    pub op: u8,

    #[serde(default)]
    pub d: Value,

    /// Sequence number, set on dispatches.
    #[serde(default)]
    pub s: Option<u64>,

    /// Event name, set on dispatches.
    #[serde(default)]
    pub t: Option<String>,
}

impl GatewayPayload {
    /// Heartbeat carrying the last sequence number seen.
    pub fn heartbeat(last_sequence: Option<u64>) -> Value {
        json!({"op": opcode::HEARTBEAT, "d": last_sequence})
    }

    /// Identify frame for a bot token.
    pub fn identify(token: &str, intents: u64) -> Value {
        json!({
            "op": opcode::IDENTIFY,
            "d": {
                "token": token,
                "intents": intents,
                "properties": {
                    "os": std::env::consts::OS,
                    "browser": "botty",
                    "device": "botty"
                }
            }
        })
    }

    /// Whether this is a dispatch with the given event name.
    pub fn is_dispatch(&self, event: &str) -> bool {
        self.op == opcode::DISPATCH && self.t.as_deref() == Some(event)
    }
}

/// Data of the HELLO frame.
#[derive(Debug, Clone, Deserialize)]
pub struct Hello {
    pub heartbeat_interval: u64,
}

/// Data of the READY dispatch.
#[derive(Debug, Clone, Deserialize)]
pub struct Ready {
    pub user: User,
    #[serde(default)]
    pub session_id: String,
}

/// Response of `GET /gateway/bot`.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayBot {
    pub url: String,
}
