//! carbon-ledger: emission normalization and aggregation engine.
//!
//! Activity records entered yearly, monthly, hourly or as fuel/distance
//! quantities are reduced to tons of CO2-equivalent per year, and kept in an
//! immutable scope -> group -> record document.
//!
//! `core` holds the pure lookups and the period aggregation; `api` composes
//! them into records and provides the structural operations on documents.

pub mod api;
pub mod core;
pub mod error;
pub mod telemetry;

pub use api::{EmissionTables, RecordFactory, RecordInput, ScopeCollection};
pub use error::{EmissionError, EmissionResult};
