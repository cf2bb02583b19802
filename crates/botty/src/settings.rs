//! Process-level settings read from the environment.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use brain_core::DEFAULT_MAX_HISTORY;
use message_listener::DEFAULT_TICK_INTERVAL;
use orchestrator::{OrchestratorConfig, DEFAULT_COMMAND_PREFIX, DEFAULT_DIRECTIVE};
use scheduler::{JokeWindow, ScheduleError};
use thiserror::Error;

/// Default data directory.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Upper bound for `BOTTY_MAX_HISTORY`.
pub const MAX_HISTORY_LIMIT: usize = 10_000;

/// Default daily joke window.
pub const DEFAULT_JOKE_WINDOW: &str = "09:00-17:00";

/// Errors in the process settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A variable is set to something unusable.
    #[error("invalid {var}={value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    /// The prompt file could not be read.
    #[error("failed to read prompt file {path:?}: {source}")]
    PromptFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The joke window is malformed.
    #[error("invalid joke window: {0}")]
    JokeWindow(#[from] ScheduleError),
}

/// Settings for the bot process.
#[derive(Debug, Clone)]
pub struct BotSettings {
    /// Directory holding documents and logs.
    pub data_dir: PathBuf,
    /// Chat messages kept per channel.
    pub max_history: usize,
    /// Period between scheduler ticks.
    pub tick_interval: Duration,
    /// Prefix that marks a command.
    pub command_prefix: String,
    /// Window in which daily jokes are posted.
    pub joke_window: JokeWindow,
    /// System directive.
    pub directive: String,
}

impl BotSettings {
    /// Read settings from `BOTTY_*` environment variables.
    ///
    /// Variables:
    /// - `BOTTY_DATA_DIR` (default `data`)
    /// - `BOTTY_MAX_HISTORY` (default 100)
    /// - `BOTTY_TICK_SECS` (default 60)
    /// - `BOTTY_COMMAND_PREFIX` (default `!`)
    /// - `BOTTY_JOKE_WINDOW` (default `09:00-17:00`)
    /// - `BOTTY_UTC_OFFSET_MINUTES` (default 0)
    /// - `BOTTY_SYSTEM_PROMPT` or `BOTTY_PROMPT_FILE` (default built-in directive)
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = get("BOTTY_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let max_history = match get("BOTTY_MAX_HISTORY") {
            Some(v) => {
                let max: usize = parse_number("BOTTY_MAX_HISTORY", &v)?;
                if max > MAX_HISTORY_LIMIT {
                    return Err(SettingsError::Invalid {
                        var: "BOTTY_MAX_HISTORY",
                        value: v,
                        reason: format!("must be at most {}", MAX_HISTORY_LIMIT),
                    });
                }
                max
            }
            None => DEFAULT_MAX_HISTORY,
        };

        let tick_interval = match get("BOTTY_TICK_SECS") {
            Some(v) => {
                let secs: u64 = parse_number("BOTTY_TICK_SECS", &v)?;
                if secs == 0 {
                    return Err(SettingsError::Invalid {
                        var: "BOTTY_TICK_SECS",
                        value: v,
                        reason: "must be at least 1".to_string(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_TICK_INTERVAL,
        };

        let command_prefix =
            get("BOTTY_COMMAND_PREFIX").unwrap_or_else(|| DEFAULT_COMMAND_PREFIX.to_string());

        let offset_minutes = match get("BOTTY_UTC_OFFSET_MINUTES") {
            Some(v) => parse_number("BOTTY_UTC_OFFSET_MINUTES", &v)?,
            None => 0,
        };
        let window = get("BOTTY_JOKE_WINDOW").unwrap_or_else(|| DEFAULT_JOKE_WINDOW.to_string());
        let joke_window = JokeWindow::parse(&window, offset_minutes)?;

        let directive = match (get("BOTTY_SYSTEM_PROMPT"), get("BOTTY_PROMPT_FILE")) {
            (Some(prompt), _) => prompt,
            (None, Some(path)) => {
                let path = PathBuf::from(path);
                let text = fs::read_to_string(&path)
                    .map_err(|source| SettingsError::PromptFile { path, source })?;
                text.trim().to_string()
            }
            (None, None) => DEFAULT_DIRECTIVE.to_string(),
        };

        Ok(Self {
            data_dir,
            max_history,
            tick_interval,
            command_prefix,
            joke_window,
            directive,
        })
    }

    /// Orchestrator configuration derived from these settings.
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig::builder()
            .directive(self.directive.as_str())
            .max_history(self.max_history)
            .command_prefix(self.command_prefix.as_str())
            .joke_window(self.joke_window)
            .build()
    }
}

fn parse_number<T>(var: &'static str, value: &str) -> Result<T, SettingsError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| SettingsError::Invalid {
            var,
            value: value.to_string(),
            reason: e.to_string(),
        })
}
