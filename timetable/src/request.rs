use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::schedule::time::{GRID_END, GRID_START};
use crate::schedule::{Candidate, ExtraHours, PlacementId, TimeRange};

/// Placement request as submitted from the dashboard form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlacementRequest {
    pub day: String,
    pub start: String,
    pub end: String,
    pub teacher: String,
    pub subject: String,
    pub room: String,
    #[serde(default)]
    pub extra_day: Option<String>,
    #[serde(default)]
    pub extra_start: Option<String>,
    #[serde(default)]
    pub extra_end: Option<String>,
    #[serde(default)]
    pub editing: Option<String>,
}

/// A request that passed validation, ready for the allocator.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub candidate: Candidate,
    pub extra: Option<ExtraHours>,
    pub editing: Option<PlacementId>,
}

fn parse_day(value: &str) -> Result<Weekday, String> {
    value
        .trim()
        .parse::<Weekday>()
        .map_err(|_| format!("Invalid day: {}", value))
}

fn parse_range(start: &str, end: &str) -> Result<TimeRange, String> {
    let range = TimeRange::parse(start, end).map_err(|e| e.to_string())?;
    if !range.within_grid() {
        return Err(format!(
            "Time outside teaching grid: {} ({}-{})",
            range, GRID_START, GRID_END
        ));
    }
    Ok(range)
}

/// Validates a placement request against the catalog.
///
/// Only checks that the request is well formed and references known
/// resources; ordering, overlap and hour rules belong to the allocator.
pub fn validate_request(req: &PlacementRequest, catalog: &Catalog) -> Result<ValidatedRequest, String> {
    let teacher = req.teacher.trim();
    let subject = req.subject.trim();
    let room = req.room.trim();

    if teacher.is_empty() {
        return Err("Teacher is required".to_string());
    }
    if subject.is_empty() {
        return Err("Subject is required".to_string());
    }
    if room.is_empty() {
        return Err("Room is required".to_string());
    }

    if !catalog.has_teacher(teacher) {
        return Err(format!("Unknown teacher: {}", teacher));
    }
    if catalog.subject(subject).is_none() {
        return Err(format!("Unknown subject: {}", subject));
    }
    if !catalog.has_room(room) {
        return Err(format!("Unknown room: {}", room));
    }

    let day = parse_day(&req.day)?;
    let range = parse_range(&req.start, &req.end)?;

    let extra = match (&req.extra_day, &req.extra_start, &req.extra_end) {
        (None, None, None) => None,
        (Some(extra_day), Some(extra_start), Some(extra_end)) => Some(ExtraHours {
            day: parse_day(extra_day)?,
            range: parse_range(extra_start, extra_end)?,
        }),
        _ => return Err("Extra hours need a day, a start and an end".to_string()),
    };

    let editing = match req.editing.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(id) => Some(
            id.parse::<PlacementId>()
                .map_err(|_| format!("Invalid placement id: {}", id))?,
        ),
    };

    Ok(ValidatedRequest {
        candidate: Candidate {
            day,
            range,
            teacher: teacher.to_string(),
            subject: subject.to_string(),
            room: room.to_string(),
        },
        extra,
        editing,
    })
}
