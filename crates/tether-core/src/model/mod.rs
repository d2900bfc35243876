//! Normalized work-item model shared by every storage backend.

pub mod item;

pub use item::{CandidateFilter, InvalidTransition, Kind, ParseEnumError, Status, WorkItem};
