//! Error types for the slot allocator and its collaborators.

use chrono::Weekday;
use thiserror::Error;

use crate::schedule::time::TimeRange;
use crate::schedule::types::PlacementId;

/// Reasons a proposed placement is rejected.
///
/// Every variant is recoverable: the allocator is left untouched and the
/// message is meant to be shown to the person who submitted the proposal.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AllocationError {
    /// End time is not after the start time.
    #[error("end before start: {day:?} {range}")]
    InvalidTimeOrder { day: Weekday, range: TimeRange },

    /// The range intersects a placement already on the grid.
    #[error("{day:?} {range} overlaps placement {conflicting}")]
    OverlapConflict {
        day: Weekday,
        range: TimeRange,
        conflicting: PlacementId,
    },

    /// The extra-hours companion intersects its own primary range.
    #[error("extra hours {day:?} {range} overlap the primary placement")]
    ExtraOverlapsPrimary { day: Weekday, range: TimeRange },

    /// Not enough hours proposed to satisfy the subject.
    #[error("{subject} still needs {missing} more hours")]
    HourDeficit { subject: String, missing: f64 },

    /// More hours proposed than the subject requires.
    #[error("{subject} is over its weekly requirement by {excess} hours")]
    HourSurplus { subject: String, excess: f64 },

    /// The placement being edited does not exist.
    #[error("no placement with id {0}")]
    UnknownPlacement(PlacementId),
}

impl AllocationError {
    /// Stable snake_case tag for API clients.
    pub fn kind(&self) -> &'static str {
        match self {
            AllocationError::InvalidTimeOrder { .. } => "invalid_time_order",
            AllocationError::OverlapConflict { .. }
            | AllocationError::ExtraOverlapsPrimary { .. } => "overlap_conflict",
            AllocationError::HourDeficit { .. } => "hour_deficit",
            AllocationError::HourSurplus { .. } => "hour_surplus",
            AllocationError::UnknownPlacement(_) => "unknown_placement",
        }
    }

    pub fn is_overlap(&self) -> bool {
        matches!(
            self,
            AllocationError::OverlapConflict { .. } | AllocationError::ExtraOverlapsPrimary { .. }
        )
    }
}

/// Errors parsing an `HH:MM` time of day.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("time cannot be empty")]
    Empty,

    #[error("invalid time '{0}': expected HH:MM")]
    Format(String),
}

/// Errors loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: unknown kind '{kind}'")]
    UnknownKind { row: usize, kind: String },

    #[error("row {row}: subject '{name}' needs a non-negative weekly_hours value")]
    MissingHours { row: usize, name: String },
}
