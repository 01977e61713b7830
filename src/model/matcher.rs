//! Fuzzy matching of normalized model names against the registry
//!
//! Scores reward longer, more specific patterns and patterns anchored at a
//! word boundary over shorter substrings that merely happen to appear
//! somewhere in the name. The formula is preserved exactly; registry order
//! breaks ties.

use super::registry::{MODEL_REGISTRY, ModelSpec};

/// Score for an exact pattern match; dominates any substring score
pub const EXACT_MATCH_SCORE: u32 = 1_000;

/// Bonus when the match starts the name or follows a hyphen
const BOUNDARY_BONUS: u32 = 50;

/// Score `pattern` against a normalized model name
///
/// Exact equality scores [`EXACT_MATCH_SCORE`]; a pattern that is not a
/// substring scores zero; otherwise
/// `10 * len(pattern) + (len(name) - index) + boundary bonus`.
pub fn calculate_match_score(normalized: &str, pattern: &str) -> u32 {
    if normalized.is_empty() || pattern.is_empty() {
        return 0;
    }
    if normalized == pattern {
        return EXACT_MATCH_SCORE;
    }
    let Some(index) = normalized.find(pattern) else {
        return 0;
    };

    let mut score = 10 * pattern.len() as u32 + (normalized.len() - index) as u32;
    let anchored = index == 0 || normalized.as_bytes()[index - 1] == b'-';
    if anchored {
        score += BOUNDARY_BONUS;
    }
    score
}

/// Find the best-scoring registry entry for a normalized name
///
/// Returns the matched pattern, its spec, and the score. Ties keep the
/// first registry entry seen (strict `>` comparison).
pub fn find_best_match(normalized: &str) -> Option<(&'static str, ModelSpec, u32)> {
    let mut best: Option<(&'static str, ModelSpec, u32)> = None;
    for (pattern, spec) in MODEL_REGISTRY.iter() {
        let score = calculate_match_score(normalized, pattern);
        if score == 0 {
            continue;
        }
        if best.map_or(true, |(_, _, best_score)| score > best_score) {
            best = Some((pattern, *spec, score));
        }
    }
    best
}
