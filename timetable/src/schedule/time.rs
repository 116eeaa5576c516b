use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::TimeParseError;

/// Length of one teaching hour on the grid, in minutes.
pub const SLOT_MINUTES: u16 = 45;
/// First slot of the day starts at 07:00.
pub const GRID_START: TimeOfDay = TimeOfDay(7 * 60);
/// Number of slots per day (07:00 to 19:00).
pub const GRID_SLOTS: u8 = 16;
/// Last slot of the day ends at 19:00.
pub const GRID_END: TimeOfDay = TimeOfDay(7 * 60 + GRID_SLOTS as u16 * SLOT_MINUTES);

/// Wall-clock time of day, stored as minutes since midnight.
///
/// Only formatted as `HH:MM` at the edges (parsing, display, serde).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Builds a time from hours and minutes, `None` if out of range.
    pub fn from_hm(hours: u16, minutes: u16) -> Option<Self> {
        if hours >= 24 || minutes >= 60 {
            return None;
        }
        Some(TimeOfDay(hours * 60 + minutes))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    fn add_minutes(self, minutes: u16) -> Self {
        TimeOfDay(self.0 + minutes)
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TimeParseError::Empty);
        }
        let parsed = NaiveTime::parse_from_str(trimmed, "%H:%M")
            .map_err(|_| TimeParseError::Format(trimmed.to_string()))?;
        Ok(TimeOfDay((parsed.hour() * 60 + parsed.minute()) as u16))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// Half-open time range `[start, end)` within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl TimeRange {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        TimeRange { start, end }
    }

    /// Parses a pair of `HH:MM` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, TimeParseError> {
        Ok(TimeRange::new(start.parse()?, end.parse()?))
    }

    pub fn is_ordered(&self) -> bool {
        self.end > self.start
    }

    /// Length in minutes, zero for an unordered range.
    pub fn duration_minutes(&self) -> u16 {
        self.end.minutes().saturating_sub(self.start.minutes())
    }

    /// Length in teaching hours (45 minute units), fractional values allowed.
    pub fn teaching_hours(&self) -> f64 {
        f64::from(self.duration_minutes()) / f64::from(SLOT_MINUTES)
    }

    /// True when the range starts no earlier than 07:00 and ends no later than 19:00.
    pub fn within_grid(&self) -> bool {
        self.start >= GRID_START && self.end <= GRID_END
    }

    /// `[s1,e1)` and `[s2,e2)` overlap iff `s1 < e2 && e1 > s2`.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && self.end > other.start
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// The fixed teaching grid: slot number (1-based) and its time range.
/// Slot 1 = 07:00-07:45, each following slot 45 minutes later, last ends 19:00.
pub fn grid_slots() -> Vec<(u8, TimeRange)> {
    (0..GRID_SLOTS)
        .map(|i| {
            let start = GRID_START.add_minutes(u16::from(i) * SLOT_MINUTES);
            (i + 1, TimeRange::new(start, start.add_minutes(SLOT_MINUTES)))
        })
        .collect()
}
