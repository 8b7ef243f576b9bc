//! Batch manifest: which version files make up each test case

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, io_err};

/// One file's history: an ordered list of version files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    pub name: String,
    pub versions: Vec<PathBuf>,
}

/// A set of cases, read from TOML:
///
/// ```toml
/// [[case]]
/// name = "ArrayReference"
/// versions = ["ArrayReference_1.java", "ArrayReference_2.java"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(rename = "case", default)]
    pub cases: Vec<Case>,
}

impl Manifest {
    pub fn from_toml_str(text: &str) -> Result<Self, ReportError> {
        Ok(toml::from_str(text)?)
    }

    /// Read a manifest; relative version paths resolve against its directory.
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let text = std::fs::read_to_string(path).map_err(io_err(path))?;
        let mut manifest = Self::from_toml_str(&text)?;
        if let Some(base) = path.parent() {
            manifest.resolve_relative_to(base);
        }
        Ok(manifest)
    }

    pub fn resolve_relative_to(&mut self, base: &Path) {
        for case in &mut self.cases {
            for version in &mut case.versions {
                if version.is_relative() {
                    *version = base.join(&*version);
                }
            }
        }
    }
}
