//! Line canonicalization and version loading

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{LhDiffError, Result};
use crate::model::{Line, Version};

/// Identifier-like runs, or single punctuation characters.
static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+|[^\w\s]").expect("token pattern is valid"));

/// Collapse whitespace runs to one space, trim, and case-fold.
pub fn normalize_line(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Split normalized text into the tokens used by fingerprints and context bags.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    TOKEN_PATTERN.find_iter(text).map(|m| m.as_str())
}

impl Version {
    /// Build a version from in-memory text. A trailing newline does not add a line.
    pub fn from_text(text: &str) -> Self {
        Self::from_lines(text.lines())
    }

    /// Build a version from already-split raw lines.
    pub fn from_lines<I, S>(raw_lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines = raw_lines
            .into_iter()
            .enumerate()
            .map(|(idx, raw)| {
                let raw = raw.as_ref();
                Line {
                    number: idx + 1,
                    normalized: normalize_line(raw),
                    raw: raw.to_string(),
                }
            })
            .collect();
        Version { lines }
    }

    /// Read and normalize a UTF-8 version file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LhDiffError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::trace!("Loaded {} ({} bytes)", path.display(), text.len());
        Ok(Self::from_text(&text))
    }
}
