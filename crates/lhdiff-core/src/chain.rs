//! Per-file pipeline: drives every stage across a version sequence

use std::collections::HashMap;
use std::path::Path;

use crate::align::align;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::expand::expand;
use crate::matcher::assign;
use crate::model::{FileChain, MappingEntry, MappingTable, PairStats, Transition, Version};
use crate::prune::prune;
use crate::score::score_all;

/// Line tracker for one file's history.
///
/// Holds only configuration; every version pair gets its own candidate pools
/// and matched set, so independent trackers or pairs can run on separate
/// threads.
#[derive(Debug, Clone, Default)]
pub struct LineTracker {
    config: PipelineConfig,
}

impl LineTracker {
    pub fn new(config: PipelineConfig) -> Self {
        LineTracker { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Map every line of `old` onto `new`.
    pub fn map_pair(&self, old: &Version, new: &Version) -> (MappingTable, PairStats) {
        let alignment = align(old, new);
        let mut matched = alignment.seed_matched_set();
        let mut stats = PairStats {
            anchors: alignment.anchors.len(),
            removed: alignment.pool.removed.len(),
            added: alignment.pool.added.len(),
            ..PairStats::default()
        };

        let mut results: HashMap<usize, MappingEntry> = HashMap::new();
        if !alignment.pool.removed.is_empty() && !alignment.pool.added.is_empty() {
            let pairs = prune(&alignment.pool, self.config.candidate_limit);
            stats.candidates = pairs.len();

            let scores = score_all(&pairs, old, new, self.config.context_window);
            let accepted = assign(&scores, self.config.match_threshold, &mut matched);
            stats.matches = accepted.len();

            for m in accepted {
                let left_text = old
                    .line(m.left)
                    .map(|l| l.normalized.as_str())
                    .unwrap_or_default();
                let target = expand(left_text, m.right, new, &mut matched);
                if !target.alternates.is_empty() {
                    tracing::trace!("Expanded {} -> {:?}", m.left, target);
                    stats.expansions += 1;
                }
                results.insert(m.left, MappingEntry::matched(m.left, target));
            }
        }

        for anchor in alignment.anchors {
            if let Some(left) = anchor.original {
                results.insert(left, anchor);
            }
        }

        let mut entries: Vec<MappingEntry> = (1..=old.len())
            .map(|n| results.remove(&n).unwrap_or_else(|| MappingEntry::deleted(n)))
            .collect();
        entries.extend(
            (1..=new.len())
                .filter(|n| !matched.is_right_claimed(*n))
                .map(MappingEntry::inserted),
        );

        tracing::debug!(
            "Mapped {} -> {} lines: {} anchors, {} removed, {} added, {} candidates, {} matches, {} expansions",
            old.len(),
            new.len(),
            stats.anchors,
            stats.removed,
            stats.added,
            stats.candidates,
            stats.matches,
            stats.expansions
        );
        (MappingTable::from_entries(entries), stats)
    }

    /// Pairwise mappings for each consecutive pair of versions.
    ///
    /// A single version maps onto itself; no versions yield an empty chain.
    pub fn map_chain(&self, versions: &[Version]) -> FileChain {
        let transitions = match versions {
            [] => Vec::new(),
            [only] => vec![Transition {
                from: 1,
                to: 1,
                table: MappingTable::identity(only.len()),
                stats: PairStats {
                    anchors: only.len(),
                    ..PairStats::default()
                },
            }],
            _ => versions
                .windows(2)
                .enumerate()
                .map(|(idx, pair)| {
                    let (table, stats) = self.map_pair(&pair[0], &pair[1]);
                    Transition {
                        from: idx + 1,
                        to: idx + 2,
                        table,
                        stats,
                    }
                })
                .collect(),
        };
        FileChain { transitions }
    }

    /// Load every version file and map the chain. Any unreadable file fails
    /// the whole chain.
    pub fn map_files<P: AsRef<Path>>(&self, paths: &[P]) -> Result<FileChain> {
        let versions = paths
            .iter()
            .map(|path| Version::load(path))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.map_chain(&versions))
    }
}
