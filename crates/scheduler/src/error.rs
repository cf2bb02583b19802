//! Error types for scheduling.

use thiserror::Error;

/// Errors produced while parsing schedule input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    /// Time of day not in `HH:MM` 24-hour form.
    #[error("Invalid time '{0}', expected HH:MM (00:00-23:59)")]
    InvalidTime(String),

    /// Joke window that is malformed or empty.
    #[error("Invalid window '{0}', expected HH:MM-HH:MM with start before end")]
    InvalidWindow(String),

    /// UTC offset outside the representable range.
    #[error("Invalid UTC offset: {0} minutes")]
    InvalidOffset(i32),
}

/// Result type alias for scheduling operations.
pub type Result<T> = std::result::Result<T, ScheduleError>;
