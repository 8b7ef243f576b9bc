//! Output document: location records per version transition

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use lhdiff_core::{FileChain, MappingEntry};
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, io_err};

/// One original line and where it went. `-1` marks a deletion (in `new`) or
/// a pure insertion (in `orig`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub orig: i64,
    pub new: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternates: Vec<i64>,
}

impl From<&MappingEntry> for LocationRecord {
    fn from(entry: &MappingEntry) -> Self {
        LocationRecord {
            orig: entry.orig_value(),
            new: entry.new_value(),
            alternates: entry.alternates().iter().map(|&n| n as i64).collect(),
        }
    }
}

/// All location records for one version transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    /// 1-based index of the later version.
    pub number: usize,
    pub from: usize,
    pub to: usize,
    pub locations: Vec<LocationRecord>,
}

/// Mapping document for one file's version chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDocument {
    pub name: String,
    pub versions: Vec<VersionRecord>,
}

/// Serialization format for documents on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Xml,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Xml => "xml",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xml" => Ok(OutputFormat::Xml),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// Original line -> unordered set of target lines, per version number.
pub type TargetSets = BTreeMap<usize, BTreeMap<i64, BTreeSet<i64>>>;

impl FileDocument {
    pub fn from_chain(name: impl Into<String>, chain: &FileChain) -> Self {
        let versions = chain
            .transitions
            .iter()
            .map(|t| VersionRecord {
                number: t.to,
                from: t.from,
                to: t.to,
                locations: t.table.entries.iter().map(LocationRecord::from).collect(),
            })
            .collect();
        FileDocument {
            name: name.into(),
            versions,
        }
    }

    /// Per original line, the set of primary and alternate targets. Insertion
    /// records are not keyed by an original line and are left out.
    pub fn target_sets(&self) -> TargetSets {
        self.versions
            .iter()
            .map(|version| {
                let lines = version
                    .locations
                    .iter()
                    .filter(|loc| loc.orig >= 0)
                    .map(|loc| {
                        let targets = std::iter::once(loc.new)
                            .chain(loc.alternates.iter().copied())
                            .collect();
                        (loc.orig, targets)
                    })
                    .collect();
                (version.number, lines)
            })
            .collect()
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, ReportError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn render(&self, format: OutputFormat) -> Result<String, ReportError> {
        match format {
            OutputFormat::Xml => self.to_xml(),
            OutputFormat::Json => self.to_json(),
        }
    }

    /// Write the document, creating parent directories as needed.
    pub fn write_to(&self, path: &Path, format: OutputFormat) -> Result<(), ReportError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err(parent))?;
        }
        let rendered = self.render(format)?;
        std::fs::write(path, rendered).map_err(io_err(path))?;
        tracing::debug!("Wrote {} document: {}", format, path.display());
        Ok(())
    }

    pub fn read_from(path: &Path, format: OutputFormat) -> Result<Self, ReportError> {
        let text = std::fs::read_to_string(path).map_err(io_err(path))?;
        match format {
            OutputFormat::Xml => Self::from_xml(&text),
            OutputFormat::Json => Self::from_json(&text),
        }
    }
}
