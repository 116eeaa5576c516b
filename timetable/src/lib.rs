//! Weekly class timetable allocation.
//!
//! The core is [`schedule::SlotAllocator`], which validates proposed
//! placements against a section's grid and subject hour budget. The
//! remaining modules feed it: a CSV catalog of teachers, rooms and
//! subjects, request validation, a batch replay mode and a JSON API.

pub mod catalog;
pub mod config;
pub mod error;
pub mod replay;
pub mod request;
pub mod schedule;
pub mod sections;
pub mod web;

pub use error::{AllocationError, CatalogError, TimeParseError};
pub use schedule::{Candidate, Commit, ExtraHours, HourBudget, Placement, PlacementId, SlotAllocator};
