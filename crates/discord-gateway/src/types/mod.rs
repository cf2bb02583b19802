//! Discord API types.

mod guild;
mod message;
mod payload;

pub use guild::{Guild, Role, ADMINISTRATOR};
pub use message::{
    Member, MessageCreate, SendMessage, SentMessage, User, DISCORD_EPOCH_MS, MAX_CONTENT_CHARS,
};
pub use payload::{intents, opcode, GatewayBot, GatewayPayload, Hello, Ready};
