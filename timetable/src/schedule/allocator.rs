use chrono::Weekday;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::error::AllocationError;
use super::budget::{HourBudget, HOUR_EPSILON};
use super::color::pick_color;
use super::overlap::{find_conflict, has_pairwise_overlap};
use super::time::TimeRange;
use super::types::{day_order, Candidate, Commit, ExtraHours, Placement, PlacementId};

/// Placements and hour budget of one section's weekly grid.
///
/// Every proposal is fully validated before anything is touched, so a
/// rejected proposal leaves the allocator exactly as it was.
#[derive(Debug, Clone)]
pub struct SlotAllocator<R = StdRng> {
    placements: Vec<Placement>,
    budget: HourBudget,
    rng: R,
}

impl SlotAllocator<StdRng> {
    /// Allocator with a deterministic id/colour source.
    pub fn seeded(budget: HourBudget, seed: u64) -> Self {
        SlotAllocator::new(budget, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(budget: HourBudget) -> Self {
        SlotAllocator::new(budget, StdRng::from_entropy())
    }
}

impl<R: Rng> SlotAllocator<R> {
    pub fn new(budget: HourBudget, rng: R) -> Self {
        SlotAllocator {
            placements: Vec::new(),
            budget,
            rng,
        }
    }

    /// Resumes from an existing grid, e.g. a previously published schedule.
    ///
    /// `placements` must not overlap one another on any day; proposals are
    /// only checked against the grid, never the grid against itself.
    pub fn with_placements(placements: Vec<Placement>, budget: HourBudget, rng: R) -> Self {
        debug_assert!(
            !has_pairwise_overlap(&placements),
            "resumed grid contains overlapping placements"
        );
        SlotAllocator {
            placements,
            budget,
            rng,
        }
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Placements ordered Monday to Sunday, then by start time.
    pub fn sorted_placements(&self) -> Vec<&Placement> {
        let mut sorted: Vec<&Placement> = self.placements.iter().collect();
        sorted.sort_by_key(|p| (day_order(p.day), p.range.start));
        sorted
    }

    pub fn get(&self, id: PlacementId) -> Option<&Placement> {
        self.placements.iter().find(|p| p.id == id)
    }

    pub fn budget(&self) -> &HourBudget {
        &self.budget
    }

    pub fn remaining_hours(&self, subject: &str) -> f64 {
        self.budget.remaining(subject)
    }

    /// Validates `candidate` (plus an optional extra-hours companion) and
    /// commits it when everything passes.
    ///
    /// With `editing` set, the candidate replaces that placement, keeping
    /// its id and colour. A successful commit always leaves the subject's
    /// remaining hours at zero.
    pub fn propose_placement(
        &mut self,
        candidate: Candidate,
        extra: Option<ExtraHours>,
        editing: Option<PlacementId>,
    ) -> Result<Commit, AllocationError> {
        let total_hours = match self.validate(&candidate, extra.as_ref(), editing) {
            Ok(total) => total,
            Err(err) => {
                debug!(subject = %candidate.subject, reason = %err, "proposal rejected");
                return Err(err);
            }
        };

        let primary = match editing.and_then(|id| self.placements.iter().position(|p| p.id == id)) {
            Some(index) => {
                let existing = &mut self.placements[index];
                if existing.subject != candidate.subject {
                    let hours = existing.assigned_hours();
                    self.budget.refund(&existing.subject, hours);
                }
                existing.day = candidate.day;
                existing.range = candidate.range;
                existing.teacher = candidate.teacher.clone();
                existing.subject = candidate.subject.clone();
                existing.room = candidate.room.clone();
                existing.id
            }
            None => self.insert(&candidate, candidate.day, candidate.range),
        };

        let extra_id = extra.map(|extra| self.insert(&candidate, extra.day, extra.range));

        self.budget.exhaust(&candidate.subject);

        info!(
            subject = %candidate.subject,
            teacher = %candidate.teacher,
            room = %candidate.room,
            hours = total_hours,
            edited = editing.is_some(),
            "placement committed"
        );

        Ok(Commit {
            primary,
            extra: extra_id,
            subject: candidate.subject,
            committed_hours: total_hours,
        })
    }

    /// Removes a placement and returns its hours to the subject's budget.
    /// Unknown ids are a no-op.
    pub fn delete_placement(&mut self, id: PlacementId) -> Option<Placement> {
        let index = self.placements.iter().position(|p| p.id == id)?;
        let removed = self.placements.remove(index);
        self.budget.refund(&removed.subject, removed.assigned_hours());
        info!(
            subject = %removed.subject,
            hours = removed.assigned_hours(),
            remaining = self.budget.remaining(&removed.subject),
            "placement deleted"
        );
        Some(removed)
    }

    /// Runs every check without mutating; returns the proposed total hours.
    fn validate(
        &self,
        candidate: &Candidate,
        extra: Option<&ExtraHours>,
        editing: Option<PlacementId>,
    ) -> Result<f64, AllocationError> {
        if !candidate.range.is_ordered() {
            return Err(AllocationError::InvalidTimeOrder {
                day: candidate.day,
                range: candidate.range,
            });
        }

        let edited = match editing {
            Some(id) => Some(self.get(id).ok_or(AllocationError::UnknownPlacement(id))?),
            None => None,
        };

        if let Some(conflict) = find_conflict(&self.placements, candidate.day, &candidate.range, editing) {
            return Err(AllocationError::OverlapConflict {
                day: candidate.day,
                range: candidate.range,
                conflicting: conflict.id,
            });
        }

        let mut total_hours = candidate.assigned_hours();

        if let Some(extra) = extra {
            if !extra.range.is_ordered() {
                return Err(AllocationError::InvalidTimeOrder {
                    day: extra.day,
                    range: extra.range,
                });
            }
            if extra.day == candidate.day && extra.range.overlaps(&candidate.range) {
                return Err(AllocationError::ExtraOverlapsPrimary {
                    day: extra.day,
                    range: extra.range,
                });
            }
            if let Some(conflict) = find_conflict(&self.placements, extra.day, &extra.range, editing) {
                return Err(AllocationError::OverlapConflict {
                    day: extra.day,
                    range: extra.range,
                    conflicting: conflict.id,
                });
            }
            total_hours += extra.range.teaching_hours();
        }

        // Hours of the placement being replaced count as already returned.
        let mut available = self.budget.remaining(&candidate.subject);
        if let Some(edited) = edited.filter(|p| p.subject == candidate.subject) {
            available += edited.assigned_hours();
        }

        let difference = available - total_hours;
        if difference > HOUR_EPSILON {
            return Err(AllocationError::HourDeficit {
                subject: candidate.subject.clone(),
                missing: difference,
            });
        }
        if difference < -HOUR_EPSILON {
            return Err(AllocationError::HourSurplus {
                subject: candidate.subject.clone(),
                excess: -difference,
            });
        }

        Ok(total_hours)
    }

    fn insert(&mut self, candidate: &Candidate, day: Weekday, range: TimeRange) -> PlacementId {
        let id = PlacementId::generate(&mut self.rng);
        let color = pick_color(&mut self.rng);
        self.placements.push(Placement {
            id,
            day,
            range,
            teacher: candidate.teacher.clone(),
            subject: candidate.subject.clone(),
            room: candidate.room.clone(),
            color,
        });
        id
    }
}
