#![forbid(unsafe_code)]
//! tether-core library.
//!
//! Data model, markdown store, remote tracker clients, and configuration for
//! the tether CLI. The readiness/prioritization engine lives in
//! `tether-engine` and consumes the [`model::WorkItem`] snapshots produced
//! here.
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` at I/O seams; typed [`error::StoreError`]
//!   for the markdown store layer.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`,
//!   `trace!`). Data-quality anomalies warn and degrade, they never abort.

pub mod config;
pub mod error;
pub mod model;
pub mod remote;
pub mod source;
pub mod store;
