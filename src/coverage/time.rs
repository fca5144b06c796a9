// src/coverage/time.rs

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::CoverageError;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Lenient `HH:MM[:SS]` → minutes since midnight.
///
/// Seconds are ignored. Empty or unparsable input yields `0`, which is
/// indistinguishable from midnight; use [`TimeOfDay::parse`] where a missing
/// value has to be rejected.
pub fn time_to_minutes(time: &str) -> u32 {
    let mut parts = time.trim().split(':');
    let hours = parts.next().and_then(|h| h.parse::<u32>().ok());
    let minutes = parts.next().and_then(|m| m.parse::<u32>().ok());
    match (hours, minutes) {
        (Some(h), Some(m)) => h.checked_mul(60).and_then(|v| v.checked_add(m)).unwrap_or(0),
        _ => 0,
    }
}

/// Minutes since midnight → `HH:MM:SS` (seconds always `00`, no wraparound).
pub fn minutes_to_time(minutes: u32) -> String {
    format!("{:02}:{:02}:00", minutes / 60, minutes % 60)
}

/// A wall-clock time at minute granularity, always within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    pub fn from_minutes(minutes: u32) -> Result<Self, CoverageError> {
        if minutes < MINUTES_PER_DAY {
            Ok(TimeOfDay(minutes))
        } else {
            Err(CoverageError::OutOfRange(minutes))
        }
    }

    /// Strict `HH:MM` / `HH:MM:SS` parser. Seconds are validated, then dropped.
    pub fn parse(s: &str) -> Result<Self, CoverageError> {
        let invalid = || CoverageError::InvalidTime(s.to_string());
        let parts: Vec<&str> = s.trim().split(':').collect();
        if !(2..=3).contains(&parts.len()) {
            return Err(invalid());
        }
        let mut fields = [0u32; 3];
        for (slot, part) in fields.iter_mut().zip(&parts) {
            if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            *slot = part.parse().map_err(|_| invalid())?;
        }
        let [h, m, sec] = fields;
        if h >= 24 || m >= 60 || sec >= 60 {
            return Err(invalid());
        }
        Ok(TimeOfDay(h * 60 + m))
    }

    pub fn minutes(self) -> u32 {
        self.0
    }
}

impl FromStr for TimeOfDay {
    type Err = CoverageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeOfDay::parse(s)
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(t: NaiveTime) -> Self {
        TimeOfDay(t.hour() * 60 + t.minute())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&minutes_to_time(self.0))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        TimeOfDay::parse(&raw).map_err(de::Error::custom)
    }
}
