//! Pipeline tuning parameters

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LhDiffError, Result};

/// Default number of nearest fingerprint neighbours kept per removed line.
pub const DEFAULT_CANDIDATE_LIMIT: usize = 15;

/// Default half-width of the context window, in lines.
pub const DEFAULT_CONTEXT_WINDOW: usize = 4;

/// Default minimum combined score for a match.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.6;

/// Parameters for one line-tracking run.
///
/// Loadable from TOML; absent keys fall back to their defaults:
///
/// ```toml
/// candidate_limit = 15
/// context_window = 4
/// match_threshold = 0.6
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// K: candidate partners kept per removed line.
    pub candidate_limit: usize,
    /// W: lines on each side of a candidate used for context similarity.
    pub context_window: usize,
    /// Scores below this are never matched.
    pub match_threshold: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
            context_window: DEFAULT_CONTEXT_WINDOW,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LhDiffError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.candidate_limit == 0 {
            return Err(LhDiffError::Config(
                "candidate_limit must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.match_threshold) {
            return Err(LhDiffError::Config(format!(
                "match_threshold {} is outside [0, 1]",
                self.match_threshold
            )));
        }
        Ok(())
    }
}
