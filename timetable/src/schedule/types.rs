use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time::TimeRange;

/// Opaque identifier of a placement on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlacementId(Uuid);

impl PlacementId {
    /// Draws a v4-layout id from the given random source.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        PlacementId(uuid::Builder::from_random_bytes(rng.gen()).into_uuid())
    }
}

impl fmt::Display for PlacementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for PlacementId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(PlacementId)
    }
}

/// A scheduled class occupying a time range on one day of a section's grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub id: PlacementId,
    pub day: Weekday,
    pub range: TimeRange,
    pub teacher: String,
    pub subject: String,
    pub room: String,
    pub color: String,
}

impl Placement {
    /// Teaching hours this placement consumes from its subject's budget.
    pub fn assigned_hours(&self) -> f64 {
        self.range.teaching_hours()
    }
}

/// A proposed placement before it has an id or colour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub day: Weekday,
    pub range: TimeRange,
    pub teacher: String,
    pub subject: String,
    pub room: String,
}

impl Candidate {
    pub fn assigned_hours(&self) -> f64 {
        self.range.teaching_hours()
    }
}

/// Second day/time range committed together with a candidate.
/// Inherits teacher, subject and room from the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtraHours {
    pub day: Weekday,
    pub range: TimeRange,
}

/// Result of a successful proposal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Commit {
    pub primary: PlacementId,
    pub extra: Option<PlacementId>,
    pub subject: String,
    pub committed_hours: f64,
}

/// Sort key putting Monday first and Sunday last.
pub fn day_order(day: Weekday) -> u32 {
    day.num_days_from_monday()
}
