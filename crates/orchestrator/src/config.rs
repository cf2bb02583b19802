//! Runtime configuration and the persisted bot settings.

use brain_core::DEFAULT_MAX_HISTORY;
use scheduler::JokeWindow;
use serde::{Deserialize, Serialize};

/// Model used until an administrator picks another.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default command prefix.
pub const DEFAULT_COMMAND_PREFIX: &str = "!";

/// The built-in Botty directive.
pub const DEFAULT_DIRECTIVE: &str = "Prompt for Botty (Discord Bot):

You are Botty, a helpful and witty Discord bot. Your main role is to assist users with their \
questions and commands, but you never miss a chance to crack a joke or respond with dry, \
sarcastic humour. You're clever, quick-witted, and always stay just on the right side of cheeky. \
While you're always willing to help, your responses should carry a light, humorous tone — \
think helpful assistant meets stand-up comedian.

Guidelines for your responses:
- Always provide useful and accurate information.
- Where appropriate, add a sarcastic remark, clever joke, or playful tease.
- Never be offensive, rude, or insulting — keep it friendly and fun.
- Tailor your humour to be suitable for a general audience (PG-rated).
- If a user is upset or frustrated, dial down the sarcasm and be more supportive — \
but still with your signature personality.

Example:
User: \"Botty, how do I reset my password?\"
Botty: \"Ah yes, the age-old struggle — forgetting your own password. Classic. No worries \
though, just head to your settings and click 'Reset Password'. Try not to forget it again this time.\"";

/// Settings mutated by admin commands and persisted as `bot_config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotConfig {
    /// Model used for chat completions.
    #[serde(default = "default_model")]
    pub active_model: String,
    /// Whether plain messages get answered without a mention.
    #[serde(default = "default_autoreply")]
    pub autoreply_enabled: bool,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_autoreply() -> bool {
    true
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            active_model: default_model(),
            autoreply_enabled: default_autoreply(),
        }
    }
}

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// System directive placed at the start of every window.
    pub directive: String,
    /// Chat messages kept per channel, besides the directive.
    pub max_history: usize,
    /// Prefix that marks a message as a command.
    pub command_prefix: String,
    /// Window in which daily jokes are posted.
    pub joke_window: JokeWindow,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            directive: DEFAULT_DIRECTIVE.to_string(),
            max_history: DEFAULT_MAX_HISTORY,
            command_prefix: DEFAULT_COMMAND_PREFIX.to_string(),
            joke_window: JokeWindow::default(),
        }
    }
}

impl OrchestratorConfig {
    /// Create a new config builder.
    pub fn builder() -> OrchestratorConfigBuilder {
        OrchestratorConfigBuilder::default()
    }
}

/// Builder for OrchestratorConfig.
#[derive(Debug, Default)]
pub struct OrchestratorConfigBuilder {
    config: OrchestratorConfig,
}

impl OrchestratorConfigBuilder {
    /// Set the system directive.
    pub fn directive(mut self, directive: impl Into<String>) -> Self {
        self.config.directive = directive.into();
        self
    }

    /// Set the history length per channel.
    pub fn max_history(mut self, max_history: usize) -> Self {
        self.config.max_history = max_history;
        self
    }

    /// Set the command prefix.
    pub fn command_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.command_prefix = prefix.into();
        self
    }

    /// Set the daily joke window.
    pub fn joke_window(mut self, window: JokeWindow) -> Self {
        self.config.joke_window = window;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> OrchestratorConfig {
        self.config
    }
}
