//! Combined string similarity: Levenshtein, character/bigram Jaccard and a
//! containment bonus, with optional keyword boosting.

use std::collections::HashSet;

use super::normalize::normalize;

const LEVENSHTEIN_WEIGHT: f64 = 0.4;
const TOKEN_WEIGHT: f64 = 0.4;
const SUBSTRING_BONUS: f64 = 0.2;
/// Maximum boost when every keyword appears in the input.
const KEYWORD_BONUS: f64 = 0.2;

/// Unit-cost edit distance over characters.
pub fn edit_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// `1 - distance / max_len`; two empty strings are identical.
pub fn levenshtein_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - edit_distance(a, b) as f64 / max_len as f64
}

/// Every character plus every overlapping two-character window.
fn tokens(text: &str) -> HashSet<&str> {
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();

    let mut set = HashSet::new();
    for w in bounds.windows(2) {
        set.insert(&text[w[0]..w[1]]);
    }
    for w in bounds.windows(3) {
        set.insert(&text[w[0]..w[2]]);
    }
    set
}

/// Jaccard index over character and bigram tokens.
pub fn token_similarity(a: &str, b: &str) -> f64 {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        _ => {}
    }

    let ta = tokens(a);
    let tb = tokens(b);
    let intersection = ta.intersection(&tb).count();
    let union = ta.union(&tb).count();
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Similarity in [0, 1] between an utterance and a pattern.
///
/// Identical normalized strings score exactly 1.0. An empty string against
/// a non-empty one scores 0.0 (the containment bonus does not apply to the
/// empty string).
pub fn calculate_similarity(input: &str, pattern: &str) -> f64 {
    let a = normalize(input);
    let b = normalize(pattern);
    similarity_normalized(&a, &b)
}

pub(crate) fn similarity_normalized(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let mut score = LEVENSHTEIN_WEIGHT * levenshtein_similarity(a, b)
        + TOKEN_WEIGHT * token_similarity(a, b);
    if a.contains(b) || b.contains(a) {
        score += SUBSTRING_BONUS;
    }
    score.min(1.0)
}

/// Base similarity plus up to 0.2 for the fraction of `keywords` found in
/// the normalized input.
///
/// Keywords are matched as given. An empty keyword is a substring of every
/// input and so always counts as found.
pub fn calculate_similarity_with_keywords<K: AsRef<str>>(
    input: &str,
    pattern: &str,
    keywords: &[K],
) -> f64 {
    let a = normalize(input);
    let b = normalize(pattern);
    let base = similarity_normalized(&a, &b);
    (base + keyword_bonus(&a, keywords.iter().map(|k| k.as_ref()))).min(1.0)
}

/// `matched / total * KEYWORD_BONUS` over an already-normalized input.
pub(crate) fn keyword_bonus<'k>(
    normalized_input: &str,
    keywords: impl Iterator<Item = &'k str>,
) -> f64 {
    let (matched, total) = keywords.fold((0usize, 0usize), |(matched, total), k| {
        (matched + usize::from(normalized_input.contains(k)), total + 1)
    });
    if total == 0 {
        return 0.0;
    }
    matched as f64 / total as f64 * KEYWORD_BONUS
}
