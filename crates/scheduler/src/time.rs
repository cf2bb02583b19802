//! Time-of-day parsing and next-occurrence math.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::error::{Result, ScheduleError};

/// A wall-clock time with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeOfDay {
    hour: u32,
    minute: u32,
}

impl TimeOfDay {
    /// Create a time of day, rejecting out-of-range fields.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    pub(crate) const fn at(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// Minutes since midnight.
    pub fn minutes(&self) -> i64 {
        i64::from(self.hour * 60 + self.minute)
    }

    /// This time of day on `date`.
    pub fn on(&self, date: NaiveDate) -> NaiveDateTime {
        at_minute(date, self.minutes())
    }
}

impl FromStr for TimeOfDay {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        parse_hhmm(s)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Parse a 24-hour `HH:MM` time. A single-digit hour is accepted.
pub fn parse_hhmm(input: &str) -> Result<TimeOfDay> {
    let invalid = || ScheduleError::InvalidTime(input.to_string());

    let (hour, minute) = input.trim().split_once(':').ok_or_else(invalid)?;
    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(hour) || hour.len() > 2 || !all_digits(minute) || minute.len() != 2 {
        return Err(invalid());
    }

    let hour: u32 = hour.parse().map_err(|_| invalid())?;
    let minute: u32 = minute.parse().map_err(|_| invalid())?;
    TimeOfDay::new(hour, minute).ok_or_else(invalid)
}

/// The first instant at or after `now` whose UTC time of day is `time`.
pub fn next_occurrence(now: DateTime<Utc>, time: TimeOfDay) -> DateTime<Utc> {
    let today = Utc.from_utc_datetime(&time.on(now.date_naive()));
    if today >= now {
        today
    } else {
        today + Duration::days(1)
    }
}

pub(crate) fn at_minute(date: NaiveDate, minute: i64) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + Duration::minutes(minute)
}
