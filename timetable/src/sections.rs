use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::info;

use crate::catalog::Catalog;
use crate::error::AllocationError;
use crate::request::{validate_request, PlacementRequest};
use crate::schedule::{Commit, SlotAllocator};

/// Why a submitted request did not commit.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SubmitError {
    /// The request itself was malformed or referenced unknown resources.
    #[error("{0}")]
    Invalid(String),
    /// The allocator refused the placement.
    #[error(transparent)]
    Rejected(#[from] AllocationError),
}

impl SubmitError {
    pub fn kind(&self) -> &'static str {
        match self {
            SubmitError::Invalid(_) => "invalid_request",
            SubmitError::Rejected(err) => err.kind(),
        }
    }
}

/// Independent grids, one per section, all sharing one catalog.
#[derive(Debug)]
pub struct Sections {
    catalog: Catalog,
    seed: Option<u64>,
    grids: BTreeMap<String, SlotAllocator>,
}

impl Sections {
    /// With a seed every section's id/colour source is deterministic.
    pub fn new(catalog: Catalog, seed: Option<u64>) -> Self {
        Sections {
            catalog,
            seed,
            grids: BTreeMap::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn get(&self, section: &str) -> Option<&SlotAllocator> {
        self.grids.get(section)
    }

    pub fn get_mut(&mut self, section: &str) -> Option<&mut SlotAllocator> {
        self.grids.get_mut(section)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SlotAllocator)> {
        self.grids.iter().map(|(name, grid)| (name.as_str(), grid))
    }

    /// A fresh grid with a full budget. Seeded sections draw their seed from
    /// the number of sections that already exist.
    fn new_grid(&self) -> SlotAllocator {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(self.grids.len() as u64)),
            None => StdRng::from_entropy(),
        };
        SlotAllocator::new(self.catalog.initial_budget(), rng)
    }

    /// Validates a request against the catalog and proposes it to the section.
    ///
    /// A section comes into existence with its first committed placement;
    /// rejected requests leave the set of sections untouched.
    pub fn submit(&mut self, section: &str, req: &PlacementRequest) -> Result<Commit, SubmitError> {
        let validated = validate_request(req, &self.catalog).map_err(SubmitError::Invalid)?;
        if let Some(grid) = self.grids.get_mut(section) {
            return Ok(grid.propose_placement(validated.candidate, validated.extra, validated.editing)?);
        }

        let mut grid = self.new_grid();
        let commit = grid.propose_placement(validated.candidate, validated.extra, validated.editing)?;
        info!(section, "section created");
        self.grids.insert(section.to_string(), grid);
        Ok(commit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::default();
        catalog.add_teacher("Ms. Chen");
        catalog.add_room("Room 101");
        catalog.add_subject("Physics", 3.0);
        catalog
    }

    fn physics(day: &str) -> PlacementRequest {
        PlacementRequest {
            day: day.into(),
            start: "09:25".into(),
            end: "11:40".into(),
            teacher: "Ms. Chen".into(),
            subject: "Physics".into(),
            room: "Room 101".into(),
            ..Default::default()
        }
    }

    #[test]
    fn sections_have_independent_grids() {
        let mut sections = Sections::new(catalog(), Some(3));
        sections.submit("10-A", &physics("Mon")).unwrap();
        // Same slot in a different section does not conflict.
        sections.submit("10-B", &physics("Mon")).unwrap();

        assert_eq!(sections.get("10-A").map(|g| g.placements().len()), Some(1));
        assert_eq!(sections.get("10-B").map(|g| g.placements().len()), Some(1));
    }

    #[test]
    fn invalid_request_never_creates_placements() {
        let mut sections = Sections::new(catalog(), Some(3));
        let req = PlacementRequest {
            room: "Gym".into(),
            ..physics("Mon")
        };
        let err = sections.submit("10-A", &req).unwrap_err();
        assert_eq!(err.kind(), "invalid_request");
        assert!(sections.get("10-A").is_none());
    }

    #[test]
    fn rejected_first_request_leaves_no_section_behind() {
        let short = PlacementRequest {
            end: "10:10".into(),
            ..physics("Mon")
        };

        let mut sections = Sections::new(catalog(), Some(3));
        let err = sections.submit("10-A", &short).unwrap_err();
        assert_eq!(err.kind(), "hour_deficit");
        assert!(sections.get("10-A").is_none());
        let after_rejection = sections.submit("10-B", &physics("Tue")).unwrap();

        let mut untouched = Sections::new(catalog(), Some(3));
        let direct = untouched.submit("10-B", &physics("Tue")).unwrap();

        assert_eq!(after_rejection.primary, direct.primary);
        assert_eq!(
            sections.get("10-B").map(|g| g.placements()[0].color.clone()),
            untouched.get("10-B").map(|g| g.placements()[0].color.clone())
        );
        assert_eq!(sections.iter().count(), 1);
    }

    #[test]
    fn submit_errors_are_std_errors() {
        let mut sections = Sections::new(catalog(), Some(3));
        sections.submit("10-A", &physics("Mon")).unwrap();
        let err = sections.submit("10-A", &physics("Mon")).unwrap_err();
        assert!(matches!(err, SubmitError::Rejected(AllocationError::OverlapConflict { .. })));

        let message = err.to_string();
        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert_eq!(boxed.to_string(), message);
        assert!(message.contains("09:25-11:40"));

        let invalid: Box<dyn std::error::Error> = Box::new(SubmitError::Invalid("Room is required".into()));
        assert_eq!(invalid.to_string(), "Room is required");
    }
}
