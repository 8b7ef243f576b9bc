//! Content and context similarity scoring

use std::collections::HashMap;

use crate::model::{CandidatePair, SimilarityScore, Version};
use crate::normalize::tokenize;

/// Weight of content similarity in the combined score.
pub const CONTENT_WEIGHT: f64 = 0.6;

/// Character-level Levenshtein distance.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Normalized edit-distance similarity in [0, 1]; 1.0 means identical.
pub fn edit_ratio(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / longest as f64
}

/// Normalized lines within `half_width` of a 1-based line, clamped to the version.
pub fn context_window(version: &Version, number: usize, half_width: usize) -> Vec<&str> {
    if version.is_empty() || number == 0 {
        return Vec::new();
    }
    let idx = (number - 1).min(version.len() - 1);
    let start = idx.saturating_sub(half_width);
    let end = (idx + half_width + 1).min(version.len());
    version.lines[start..end]
        .iter()
        .map(|l| l.normalized.as_str())
        .collect()
}

/// Token frequencies across a window of lines.
pub fn bag_of_words<'a>(lines: &[&'a str]) -> HashMap<&'a str, usize> {
    let mut bag = HashMap::new();
    for &line in lines {
        for token in tokenize(line) {
            *bag.entry(token).or_insert(0) += 1;
        }
    }
    bag
}

/// Cosine similarity of two frequency vectors.
///
/// Two empty bags are equal context (1.0); exactly one empty bag gives 0.0.
pub fn cosine_similarity(a: &HashMap<&str, usize>, b: &HashMap<&str, usize>) -> f64 {
    let norm_a: f64 = a.values().map(|&c| (c * c) as f64).sum();
    let norm_b: f64 = b.values().map(|&c| (c * c) as f64).sum();

    match (norm_a == 0.0, norm_b == 0.0) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        (false, false) => {}
    }

    let dot: f64 = a
        .iter()
        .filter_map(|(token, &ca)| b.get(token).map(|&cb| (ca * cb) as f64))
        .sum();
    (dot / (norm_a * norm_b).sqrt()).clamp(0.0, 1.0)
}

/// Cosine similarity of the bag-of-words windows around two lines.
pub fn context_similarity(
    old: &Version,
    left: usize,
    new: &Version,
    right: usize,
    half_width: usize,
) -> f64 {
    let left_bag = bag_of_words(&context_window(old, left, half_width));
    let right_bag = bag_of_words(&context_window(new, right, half_width));
    cosine_similarity(&left_bag, &right_bag)
}

/// `CONTENT_WEIGHT * content + (1 - CONTENT_WEIGHT) * context`, in [0, 1].
pub fn combine(content: f64, context: f64) -> f64 {
    (CONTENT_WEIGHT * content + (1.0 - CONTENT_WEIGHT) * context).clamp(0.0, 1.0)
}

/// Score one candidate pair against the full versions it came from.
///
/// Context windows include lines already claimed elsewhere in the run.
pub fn score_pair(
    pair: &CandidatePair<'_>,
    old: &Version,
    new: &Version,
    half_width: usize,
) -> SimilarityScore {
    let content = edit_ratio(&pair.removed.normalized, &pair.added.normalized);
    let context = context_similarity(
        old,
        pair.removed.number,
        new,
        pair.added.number,
        half_width,
    );
    SimilarityScore {
        left: pair.removed.number,
        right: pair.added.number,
        score: combine(content, context),
    }
}

pub fn score_all(
    pairs: &[CandidatePair<'_>],
    old: &Version,
    new: &Version,
    half_width: usize,
) -> Vec<SimilarityScore> {
    pairs
        .iter()
        .map(|pair| score_pair(pair, old, new, half_width))
        .collect()
}
