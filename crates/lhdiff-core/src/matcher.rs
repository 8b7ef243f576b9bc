//! Greedy one-to-one assignment over similarity scores

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::{MatchedSet, SimilarityScore};

/// A left/right pairing accepted by the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub left: usize,
    pub right: usize,
    pub score: f64,
}

/// Total order: score descending, then left ascending, then right ascending.
pub fn ranking(a: &SimilarityScore, b: &SimilarityScore) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then(a.left.cmp(&b.left))
        .then(a.right.cmp(&b.right))
}

/// Accept pairs in ranking order while their score reaches `threshold`,
/// skipping any pair with a side already in `matched`. No backtracking.
pub fn assign(scores: &[SimilarityScore], threshold: f64, matched: &mut MatchedSet) -> Vec<Match> {
    let mut ranked = scores.to_vec();
    ranked.sort_by(ranking);

    let mut accepted = Vec::new();
    for candidate in ranked {
        if candidate.score < threshold {
            break;
        }
        if matched.claim(candidate.left, candidate.right) {
            tracing::trace!(
                "Matched {} -> {} (score {:.3})",
                candidate.left,
                candidate.right,
                candidate.score
            );
            accepted.push(Match {
                left: candidate.left,
                right: candidate.right,
                score: candidate.score,
            });
        }
    }
    accepted
}
