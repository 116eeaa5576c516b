pub mod time;
pub mod types;
pub mod color;
pub mod budget;
pub mod overlap;
pub mod allocator;

pub use allocator::SlotAllocator;
pub use budget::HourBudget;
pub use time::{grid_slots, TimeOfDay, TimeRange};
pub use types::{Candidate, Commit, ExtraHours, Placement, PlacementId};
