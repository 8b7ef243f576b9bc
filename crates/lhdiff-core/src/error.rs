//! Error taxonomy for the line-tracking pipeline

use std::path::PathBuf;

/// Failures surfaced by `lhdiff-core`.
///
/// Degenerate inputs (empty files, single versions) and arithmetic edge cases in
/// scoring are not errors; they have defined results.
#[derive(Debug, thiserror::Error)]
pub enum LhDiffError {
    /// A version file could not be read. Fails the whole file chain.
    #[error("cannot read version file {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration values out of their valid range.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Configuration file is not valid TOML for `PipelineConfig`.
    #[error("cannot parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A mapping table does not cover every line exactly once.
    #[error("mapping coverage violated: {0}")]
    Coverage(String),
}

pub type Result<T> = std::result::Result<T, LhDiffError>;
