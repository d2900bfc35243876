//! Remote work-tracking clients.
//!
//! Two backends are supported: a GitHub-like issue tracker ([`hub`]) and an
//! Azure-DevOps-like work-item service ([`board`]). Both are blocking `ureq`
//! clients that normalize responses into [`crate::model::WorkItem`] snapshots
//! and implement [`crate::source::WorkItemSource`].
//!
//! Dependency probes are opportunistic and fail open: a transport failure is
//! logged as a recoverable warning and reported as "no dependency", never
//! aborting a recommendation batch.

pub mod board;
pub mod hub;
pub mod query;
