//! Mapping documents and batch runs for lhdiff
//!
//! Turns pipeline results into the location-record schema shared with the
//! ground-truth corpus, and runs many independent files in parallel.

pub mod document;
pub mod xml;
pub mod manifest;
pub mod batch;
pub mod error;

#[cfg(test)]
pub mod tests;

pub use document::{FileDocument, VersionRecord, LocationRecord, OutputFormat, TargetSets};
pub use manifest::{Manifest, Case};
pub use batch::{BatchSummary, CaseSuccess, CaseFailure, run_batch, run_case, write_case};
pub use error::ReportError;
