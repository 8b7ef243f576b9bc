//! Parallel batch runner over independent test cases

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use lhdiff_core::{LineTracker, PipelineConfig};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::document::{FileDocument, OutputFormat};
use crate::error::{ReportError, io_err};
use crate::manifest::{Case, Manifest};

/// A case whose document was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseSuccess {
    pub name: String,
    pub output: PathBuf,
    pub transitions: usize,
}

/// A case that failed; the rest of the batch still ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseFailure {
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub succeeded: Vec<CaseSuccess>,
    pub failures: Vec<CaseFailure>,
}

impl BatchSummary {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Load and map one case.
pub fn run_case(case: &Case, tracker: &LineTracker) -> Result<FileDocument, ReportError> {
    let chain = tracker.map_files(&case.versions[..])?;
    Ok(FileDocument::from_chain(&case.name, &chain))
}

/// Output file for a case. The name must be a single plain path component.
fn output_path(name: &str, output_dir: &Path, format: OutputFormat) -> Result<PathBuf, ReportError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(ReportError::CaseName(format!("{name:?} is not a plain file name")));
    }
    Ok(output_dir.join(format!("{}.{}", name, format.extension())))
}

/// Map one case and write its document into `output_dir`.
pub fn write_case(
    case: &Case,
    tracker: &LineTracker,
    output_dir: &Path,
    format: OutputFormat,
) -> Result<CaseSuccess, ReportError> {
    let output = output_path(&case.name, output_dir, format)?;
    let document = run_case(case, tracker)?;
    document.write_to(&output, format)?;
    Ok(CaseSuccess {
        name: case.name.clone(),
        output,
        transitions: document.versions.len(),
    })
}

/// Run every case in parallel. Each case gets its own pipeline state; a
/// failure is recorded and does not stop the others. A case reusing an
/// earlier case's name is recorded as a failure instead of overwriting it.
pub fn run_batch(
    manifest: &Manifest,
    config: &PipelineConfig,
    output_dir: &Path,
    format: OutputFormat,
) -> Result<BatchSummary, ReportError> {
    std::fs::create_dir_all(output_dir).map_err(io_err(output_dir))?;
    let started_at = Utc::now();
    let tracker = LineTracker::new(config.clone());

    let mut seen = HashSet::new();
    let duplicate: Vec<bool> = manifest
        .cases
        .iter()
        .map(|case| !seen.insert(case.name.as_str()))
        .collect();

    let results: Vec<_> = manifest
        .cases
        .par_iter()
        .zip(duplicate.par_iter())
        .map(|(case, &is_duplicate)| {
            let result = if is_duplicate {
                Err(ReportError::CaseName(format!("duplicate case name {:?}", case.name)))
            } else {
                write_case(case, &tracker, output_dir, format)
            };
            (case, result)
        })
        .collect();

    let mut summary = BatchSummary {
        started_at,
        finished_at: started_at,
        succeeded: Vec::new(),
        failures: Vec::new(),
    };
    for (case, result) in results {
        match result {
            Ok(success) => {
                tracing::info!(
                    "{}: {} transitions -> {}",
                    case.name,
                    success.transitions,
                    success.output.display()
                );
                summary.succeeded.push(success);
            }
            Err(e) => {
                tracing::warn!("{}: skipped: {}", case.name, e);
                summary.failures.push(CaseFailure {
                    name: case.name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }
    summary.finished_at = Utc::now();
    Ok(summary)
}
