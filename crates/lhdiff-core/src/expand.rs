//! Span expansion for lines split across several later lines

use crate::model::{MatchedSet, Target, Version};
use crate::score::edit_ratio;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Backward,
    Forward,
}

/// Concatenated normalized text of lines `start..=end`.
fn span_text(version: &Version, start: usize, end: usize) -> String {
    version.lines[start - 1..end]
        .iter()
        .map(|l| l.normalized.as_str())
        .collect()
}

/// Grow the right-side span around `primary` one line at a time while doing so
/// raises the edit ratio against `left_text`.
///
/// Each step compares the current span with the span extended one unclaimed
/// line backward and one forward; the unextended span wins ties, and backward
/// wins over forward. Absorbed lines are claimed in `matched`.
pub fn expand(left_text: &str, primary: usize, new: &Version, matched: &mut MatchedSet) -> Target {
    let mut target = Target::single(primary);
    if primary == 0 || primary > new.len() {
        return target;
    }

    let (mut start, mut end) = (primary, primary);
    let budget = new.len().saturating_sub(matched.right_claimed_count());

    for _ in 0..budget {
        let mut best = edit_ratio(left_text, &span_text(new, start, end));
        let mut step = None;

        if start > 1 && !matched.is_right_claimed(start - 1) {
            let ratio = edit_ratio(left_text, &span_text(new, start - 1, end));
            if ratio > best {
                best = ratio;
                step = Some(Step::Backward);
            }
        }
        if end < new.len() && !matched.is_right_claimed(end + 1) {
            let ratio = edit_ratio(left_text, &span_text(new, start, end + 1));
            if ratio > best {
                step = Some(Step::Forward);
            }
        }

        let absorbed = match step {
            Some(Step::Backward) => {
                start -= 1;
                start
            }
            Some(Step::Forward) => {
                end += 1;
                end
            }
            None => break,
        };
        matched.claim_right(absorbed);
        target.alternates.push(absorbed);
    }

    target.alternates.sort_unstable();
    target
}
