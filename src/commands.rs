//! CLI command implementations

use anyhow::Context;
use lhdiff_core::{LineTracker, PipelineConfig};
use lhdiff_report::{FileDocument, Manifest, OutputFormat};
use std::path::{Path, PathBuf};

pub fn load_config(path: Option<&Path>) -> anyhow::Result<PipelineConfig> {
    match path {
        Some(path) => {
            tracing::debug!("Loading configuration: {}", path.display());
            Ok(PipelineConfig::load(path)?)
        }
        None => Ok(PipelineConfig::default()),
    }
}

pub fn map(
    versions: &[PathBuf],
    output: Option<PathBuf>,
    format: OutputFormat,
    name: Option<String>,
    config: &PipelineConfig,
) -> anyhow::Result<()> {
    tracing::info!("Mapping {} versions", versions.len());

    let tracker = LineTracker::new(config.clone());
    let chain = tracker.map_files(versions)?;

    let name = name.unwrap_or_else(|| default_name(versions));
    let document = FileDocument::from_chain(name, &chain);

    match output {
        Some(path) => {
            document.write_to(&path, format)?;
            tracing::info!("Wrote {}", path.display());
        }
        None => println!("{}", document.render(format)?),
    }
    Ok(())
}

pub fn batch(
    manifest: &Path,
    output_dir: &Path,
    format: OutputFormat,
    config: &PipelineConfig,
) -> anyhow::Result<()> {
    let manifest = Manifest::load(manifest)
        .with_context(|| format!("loading manifest {}", manifest.display()))?;
    tracing::info!("Running {} cases into {}", manifest.cases.len(), output_dir.display());

    let summary = lhdiff_report::run_batch(&manifest, config, output_dir, format)?;

    let elapsed = summary.finished_at - summary.started_at;
    tracing::info!(
        "{} cases mapped, {} failed in {} ms",
        summary.succeeded.len(),
        summary.failures.len(),
        elapsed.num_milliseconds()
    );
    for failure in &summary.failures {
        eprintln!("{}: {}", failure.name, failure.error);
    }
    Ok(())
}

/// File stem of the first version, with a trailing `_<n>` version suffix removed.
fn default_name(versions: &[PathBuf]) -> String {
    let stem = versions
        .first()
        .and_then(|p| p.file_stem())
        .and_then(|s| s.to_str())
        .unwrap_or("file");
    match stem.rsplit_once('_') {
        Some((base, suffix)) if !base.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()) => {
            base.to_string()
        }
        _ => stem.to_string(),
    }
}
