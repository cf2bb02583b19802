//! Scheduled announcements and daily joke subscriptions for Botty.
//!
//! This crate holds the reconciliation logic driven by the periodic tick.
//! It performs no I/O: callers hand in the current time and a random
//! number generator, and get back what to send and whether state changed.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use scheduler::{next_occurrence, parse_hhmm, Recurrence, Schedule, ScheduledItem};
//!
//! let now = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
//! let at = next_occurrence(now, parse_hhmm("09:00").unwrap());
//! assert_eq!(at, Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap());
//!
//! let mut schedule = Schedule::new();
//! schedule.push(ScheduledItem::new("123", "Standup!", at, Recurrence::Daily));
//! assert!(schedule.take_due(now).is_empty());
//! ```

mod error;
mod item;
mod joke;
mod jokes;
mod time;

pub use error::{Result, ScheduleError};
pub use item::{Recurrence, Schedule, ScheduledItem};
pub use joke::{DailyJokeSubscription, JokeSubscriptions, JokeTick, JokeWindow};
pub use jokes::{random_joke, JOKES};
pub use time::{next_occurrence, parse_hhmm, TimeOfDay};
