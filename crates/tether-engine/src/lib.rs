#![forbid(unsafe_code)]
//! tether-engine library.
//!
//! The readiness and prioritization core: given one snapshot of
//! [`tether_core::model::WorkItem`]s, decide which items are actionable now,
//! which are blocked and why, rank the actionable ones, and recommend a
//! single best next task.
//!
//! Everything here is a pure, synchronous function of the snapshot: no I/O,
//! no shared state, nothing persisted between calls. Safe to call repeatedly
//! and concurrently on independent snapshots. Anomalous input degrades to
//! "treat as available" or "treat as lowest priority"; nothing in this crate
//! returns an error or panics on data.
//!
//! # Conventions
//!
//! - **Errors**: None. The engine is total over any `&[WorkItem]`.
//! - **Logging**: `tracing` debug spans only; data-quality warnings belong to
//!   the collaborators that build snapshots.

pub mod digest;
pub mod readiness;
pub mod recommend;
pub mod score;

pub use digest::{StandupReport, StatusDigest};
pub use readiness::{BlockedItem, Readiness, ReadinessResult, resolve, resolve_readiness, tag_blocked};
pub use recommend::{Recommendation, find_best_task, reasons, recommend_next, recommend_next_confirmed};
pub use score::{ScoredCandidate, score, score_and_rank};
