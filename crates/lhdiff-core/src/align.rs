//! Exact-match alignment producing anchors and candidate pools

use similar::{Algorithm, DiffTag, capture_diff_slices};

use crate::model::{CandidatePool, MappingEntry, MatchedSet, Version};

/// Result of diffing two versions on normalized text.
#[derive(Debug, Clone, Default)]
pub struct Alignment<'a> {
    /// Unchanged lines, matched 1:1.
    pub anchors: Vec<MappingEntry>,
    /// Lines inside changed regions.
    pub pool: CandidatePool<'a>,
}

impl Alignment<'_> {
    /// A matched set pre-seeded with every anchor.
    pub fn seed_matched_set(&self) -> MatchedSet {
        let mut matched = MatchedSet::new();
        for anchor in &self.anchors {
            if let (Some(left), Some(target)) = (anchor.original, &anchor.target) {
                matched.claim(left, target.primary);
            }
        }
        matched
    }
}

/// Diff `old` against `new`. Equal runs become anchors; every line in a
/// differing run lands in the removed or added pool, in positional order.
pub fn align<'a>(old: &'a Version, new: &'a Version) -> Alignment<'a> {
    let old_text = old.normalized();
    let new_text = new.normalized();
    let ops = capture_diff_slices(Algorithm::Myers, &old_text[..], &new_text[..]);

    let mut alignment = Alignment::default();
    for op in &ops {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => {
                for (o, n) in old_range.zip(new_range) {
                    alignment.anchors.push(MappingEntry::anchor(
                        old.lines[o].number,
                        new.lines[n].number,
                    ));
                }
            }
            DiffTag::Delete | DiffTag::Insert | DiffTag::Replace => {
                alignment.pool.removed.extend(old.lines[old_range].iter());
                alignment.pool.added.extend(new.lines[new_range].iter());
            }
        }
    }
    alignment
}
