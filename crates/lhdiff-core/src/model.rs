//! Core data structures for line tracking

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{LhDiffError, Result};

/// A single line of one file snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// 1-based position within its version.
    pub number: usize,
    /// Whitespace-collapsed, trimmed, case-folded text used for comparison.
    pub normalized: String,
    /// Text as read from the file, without the line terminator.
    pub raw: String,
}

/// An ordered sequence of lines belonging to one file snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub lines: Vec<Line>,
}

impl Version {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Look up a line by its 1-based number.
    pub fn line(&self, number: usize) -> Option<&Line> {
        number.checked_sub(1).and_then(|idx| self.lines.get(idx))
    }

    /// Normalized texts in positional order.
    pub fn normalized(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.normalized.as_str()).collect()
    }
}

/// Lines left over from the exact diff, eligible for re-matching.
///
/// Scoped to one version-pair run and dropped once matching completes.
#[derive(Debug, Clone, Default)]
pub struct CandidatePool<'a> {
    /// Lines from the earlier version inside changed regions.
    pub removed: Vec<&'a Line>,
    /// Lines from the later version inside changed regions.
    pub added: Vec<&'a Line>,
}

impl CandidatePool<'_> {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

/// A removed/added pairing that survived fingerprint pruning.
#[derive(Debug, Clone, Copy)]
pub struct CandidatePair<'a> {
    pub removed: &'a Line,
    pub added: &'a Line,
    /// Hamming distance between the two fingerprints.
    pub distance: u32,
}

/// Combined similarity of one candidate pair, in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityScore {
    pub left: usize,
    pub right: usize,
    pub score: f64,
}

/// Left and right line numbers already claimed within one version-pair run.
#[derive(Debug, Clone, Default)]
pub struct MatchedSet {
    left: HashSet<usize>,
    right: HashSet<usize>,
}

impl MatchedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim both sides of a pairing. Returns false if either was already taken.
    pub fn claim(&mut self, left: usize, right: usize) -> bool {
        if self.left.contains(&left) || self.right.contains(&right) {
            return false;
        }
        self.left.insert(left);
        self.right.insert(right);
        true
    }

    /// Claim a right-side line absorbed by an expansion.
    pub fn claim_right(&mut self, right: usize) -> bool {
        self.right.insert(right)
    }

    pub fn is_left_claimed(&self, left: usize) -> bool {
        self.left.contains(&left)
    }

    pub fn is_right_claimed(&self, right: usize) -> bool {
        self.right.contains(&right)
    }

    pub fn right_claimed_count(&self) -> usize {
        self.right.len()
    }
}

/// Where a mapped line landed in the later version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub primary: usize,
    /// Additional lines absorbed by span expansion, ascending.
    pub alternates: Vec<usize>,
}

impl Target {
    pub fn single(primary: usize) -> Self {
        Target {
            primary,
            alternates: Vec::new(),
        }
    }

    /// Primary followed by every alternate.
    pub fn lines(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::once(self.primary).chain(self.alternates.iter().copied())
    }
}

/// The role a line plays in a mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// Unchanged line matched by the exact diff.
    Anchor,
    /// Changed line paired by similarity scoring.
    Matched,
    /// Original line with no counterpart.
    Deleted,
    /// Later-version line with no counterpart.
    Inserted,
}

/// One row of a mapping table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    /// `None` for a pure insertion.
    pub original: Option<usize>,
    /// `None` for a deletion.
    pub target: Option<Target>,
    pub kind: EntryKind,
}

impl MappingEntry {
    pub fn anchor(line: usize, target: usize) -> Self {
        MappingEntry {
            original: Some(line),
            target: Some(Target::single(target)),
            kind: EntryKind::Anchor,
        }
    }

    pub fn matched(line: usize, target: Target) -> Self {
        MappingEntry {
            original: Some(line),
            target: Some(target),
            kind: EntryKind::Matched,
        }
    }

    pub fn deleted(line: usize) -> Self {
        MappingEntry {
            original: Some(line),
            target: None,
            kind: EntryKind::Deleted,
        }
    }

    pub fn inserted(target: usize) -> Self {
        MappingEntry {
            original: None,
            target: Some(Target::single(target)),
            kind: EntryKind::Inserted,
        }
    }

    /// Original line number, or -1 for an insertion.
    pub fn orig_value(&self) -> i64 {
        self.original.map_or(-1, |n| n as i64)
    }

    /// Primary target line number, or -1 for a deletion.
    pub fn new_value(&self) -> i64 {
        self.target.as_ref().map_or(-1, |t| t.primary as i64)
    }

    pub fn alternates(&self) -> &[usize] {
        match &self.target {
            Some(target) => &target.alternates,
            None => &[],
        }
    }

    /// Sort key: insertions first, ordered by their own target line.
    fn sort_key(&self) -> (i64, i64) {
        (self.orig_value(), self.new_value())
    }
}

/// Pairwise mapping between two consecutive versions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingTable {
    pub entries: Vec<MappingEntry>,
}

impl MappingTable {
    /// Build a table from unordered entries.
    pub fn from_entries(mut entries: Vec<MappingEntry>) -> Self {
        entries.sort_by_key(MappingEntry::sort_key);
        MappingTable { entries }
    }

    /// Every line of a version mapped to itself.
    pub fn identity(len: usize) -> Self {
        MappingTable {
            entries: (1..=len).map(|n| MappingEntry::anchor(n, n)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for an original line number.
    pub fn get(&self, original: usize) -> Option<&MappingEntry> {
        self.entries.iter().find(|e| e.original == Some(original))
    }

    /// Entries for later-version lines with no counterpart.
    pub fn insertions(&self) -> impl Iterator<Item = &MappingEntry> {
        self.entries.iter().filter(|e| e.original.is_none())
    }

    pub fn count_kind(&self, kind: EntryKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    /// Check that every left line 1..=left_len and every right line
    /// 1..=right_len is referenced exactly once.
    pub fn validate(&self, left_len: usize, right_len: usize) -> Result<()> {
        let mut left_seen = vec![false; left_len];
        let mut right_seen = vec![false; right_len];

        for entry in &self.entries {
            if let Some(orig) = entry.original {
                let slot = orig
                    .checked_sub(1)
                    .and_then(|idx| left_seen.get_mut(idx))
                    .ok_or_else(|| {
                        LhDiffError::Coverage(format!("original line {orig} out of range"))
                    })?;
                if *slot {
                    return Err(LhDiffError::Coverage(format!(
                        "original line {orig} mapped twice"
                    )));
                }
                *slot = true;
            }

            if let Some(target) = &entry.target {
                for line in target.lines() {
                    let slot = line
                        .checked_sub(1)
                        .and_then(|idx| right_seen.get_mut(idx))
                        .ok_or_else(|| {
                            LhDiffError::Coverage(format!("target line {line} out of range"))
                        })?;
                    if *slot {
                        return Err(LhDiffError::Coverage(format!(
                            "target line {line} claimed twice"
                        )));
                    }
                    *slot = true;
                }
            }
        }

        if let Some(idx) = left_seen.iter().position(|seen| !seen) {
            return Err(LhDiffError::Coverage(format!(
                "original line {} missing",
                idx + 1
            )));
        }
        if let Some(idx) = right_seen.iter().position(|seen| !seen) {
            return Err(LhDiffError::Coverage(format!(
                "target line {} missing",
                idx + 1
            )));
        }
        Ok(())
    }
}

/// Work counters for one version-pair run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairStats {
    pub anchors: usize,
    pub removed: usize,
    pub added: usize,
    pub candidates: usize,
    pub matches: usize,
    pub expansions: usize,
}

/// Mapping from one version to the next in a file's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// 1-based index of the earlier version.
    pub from: usize,
    /// 1-based index of the later version.
    pub to: usize,
    pub table: MappingTable,
    pub stats: PairStats,
}

/// Every pairwise mapping for one file's version sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileChain {
    pub transitions: Vec<Transition>,
}
