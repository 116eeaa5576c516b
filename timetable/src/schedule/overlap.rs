use chrono::Weekday;

use super::time::TimeRange;
use super::types::{Placement, PlacementId};

/// Finds the first placement on `day` whose range intersects `range`,
/// skipping the placement with id `skip` (the one being edited).
pub fn find_conflict<'a>(
    placements: &'a [Placement],
    day: Weekday,
    range: &TimeRange,
    skip: Option<PlacementId>,
) -> Option<&'a Placement> {
    placements
        .iter()
        .filter(|p| Some(p.id) != skip)
        .find(|p| p.day == day && p.range.overlaps(range))
}

/// Checks the grid invariant: no two placements on the same day overlap.
pub fn has_pairwise_overlap(placements: &[Placement]) -> bool {
    placements.iter().enumerate().any(|(i, a)| {
        placements[i + 1..]
            .iter()
            .any(|b| a.day == b.day && a.range.overlaps(&b.range))
    })
}
