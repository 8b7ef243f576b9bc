//! Errors raised while producing or reading mapping documents

use std::path::PathBuf;

use lhdiff_core::LhDiffError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Core(#[from] LhDiffError),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("XML error: {0}")]
    Xml(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot parse manifest: {0}")]
    Manifest(#[from] toml::de::Error),

    #[error("malformed mapping document: {0}")]
    InvalidDocument(String),

    /// A case name that cannot be used as an output file stem.
    #[error("invalid case name: {0}")]
    CaseName(String),
}

pub(crate) fn xml_err(err: impl std::fmt::Display) -> ReportError {
    ReportError::Xml(err.to_string())
}

pub(crate) fn io_err(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> ReportError {
    let path = path.into();
    move |source| ReportError::Io { path, source }
}
