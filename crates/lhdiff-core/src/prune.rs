//! Simhash fingerprints and nearest-neighbour candidate pruning

use std::hash::{DefaultHasher, Hash, Hasher};

use crate::model::{CandidatePair, CandidatePool};
use crate::normalize::tokenize;

/// 64-bit simhash over the tokens of a normalized line. Lines without tokens
/// fingerprint to zero.
pub fn fingerprint(text: &str) -> u64 {
    let mut weights = [0i32; 64];
    let mut any = false;

    for token in tokenize(text) {
        any = true;
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        let h = hasher.finish();

        for (bit, weight) in weights.iter_mut().enumerate() {
            if (h >> bit) & 1 == 1 {
                *weight += 1;
            } else {
                *weight -= 1;
            }
        }
    }

    if !any {
        return 0;
    }

    weights
        .iter()
        .enumerate()
        .filter(|(_, w)| **w > 0)
        .fold(0u64, |acc, (bit, _)| acc | (1u64 << bit))
}

/// Number of differing bits.
pub fn hamming_distance(a: u64, b: u64) -> u32 {
    (a ^ b).count_ones()
}

/// For every removed line keep the `k` added lines with the smallest
/// fingerprint distance. Equal distances keep positional order.
pub fn prune<'a>(pool: &CandidatePool<'a>, k: usize) -> Vec<CandidatePair<'a>> {
    if pool.removed.is_empty() || pool.added.is_empty() || k == 0 {
        return Vec::new();
    }

    let added: Vec<_> = pool
        .added
        .iter()
        .map(|line| (*line, fingerprint(&line.normalized)))
        .collect();

    let mut pairs = Vec::with_capacity(pool.removed.len() * k.min(added.len()));
    for &removed in &pool.removed {
        let print = fingerprint(&removed.normalized);
        let mut ranked: Vec<_> = added
            .iter()
            .map(|(line, other)| (*line, hamming_distance(print, *other)))
            .collect();
        ranked.sort_by_key(|(line, distance)| (*distance, line.number));

        pairs.extend(ranked.into_iter().take(k).map(|(added, distance)| CandidatePair {
            removed,
            added,
            distance,
        }));
    }
    pairs
}
