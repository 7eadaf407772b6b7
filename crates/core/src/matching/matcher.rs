//! Best-match search over candidate patterns.
//!
//! Linear scan, strictly-greater comparison: on equal scores the earlier
//! candidate wins.

use serde::Serialize;

use super::config::FuzzyMatcherConfig;
use super::normalize::{normalize, normalized_len};
use super::similarity::{keyword_bonus, similarity_normalized};

/// Threshold for plain matching when the caller passes `None`.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.8;
/// Threshold for keyword-boosted matching when the caller passes `None`.
pub const DEFAULT_KEYWORD_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BestMatch {
    pub index: usize,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordMatch {
    pub index: usize,
    pub score: f64,
    pub pattern: String,
}

/// Index and score of the most similar pattern, or `None` if the list is
/// empty or the best score is below `threshold`.
pub fn find_best_match<P: AsRef<str>>(
    input: &str,
    patterns: &[P],
    threshold: Option<f64>,
) -> Option<BestMatch> {
    let threshold = threshold.unwrap_or(DEFAULT_MATCH_THRESHOLD);
    let input = normalize(input);

    let mut best: Option<BestMatch> = None;
    for (index, pattern) in patterns.iter().enumerate() {
        let score = similarity_normalized(&input, &normalize(pattern.as_ref()));
        if best.map_or(true, |b| score > b.score) {
            best = Some(BestMatch { index, score });
        }
    }

    best.filter(|b| b.score >= threshold)
}

/// Keyword-boosted variant of [`find_best_match`].
///
/// Each candidate is a pattern and its keyword list.
pub fn find_best_match_with_keywords<P: AsRef<str>, K: AsRef<str>>(
    input: &str,
    patterns: &[(P, Vec<K>)],
    threshold: Option<f64>,
) -> Option<KeywordMatch> {
    let threshold = threshold.unwrap_or(DEFAULT_KEYWORD_THRESHOLD);
    let input = normalize(input);

    let mut best: Option<(usize, f64)> = None;
    for (index, (pattern, keywords)) in patterns.iter().enumerate() {
        let base = similarity_normalized(&input, &normalize(pattern.as_ref()));
        let score = (base + keyword_bonus(&input, keywords.iter().map(|k| k.as_ref()))).min(1.0);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((index, score));
        }
    }

    best.filter(|&(_, score)| score >= threshold)
        .map(|(index, score)| KeywordMatch {
            index,
            score,
            pattern: patterns[index].0.as_ref().to_string(),
        })
}

/// How much to trust a score under a given profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum MatchConfidence {
    None,
    Partial,
    Good,
    High,
}

/// Matching bound to one immutable profile.
#[derive(Debug, Clone, Default)]
pub struct FuzzyMatcher {
    config: FuzzyMatcherConfig,
}

impl FuzzyMatcher {
    pub fn new(config: FuzzyMatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FuzzyMatcherConfig {
        &self.config
    }

    pub fn similarity(&self, input: &str, pattern: &str) -> f64 {
        similarity_normalized(&normalize(input), &normalize(pattern))
    }

    pub fn is_match(&self, input: &str, pattern: &str) -> bool {
        self.similarity(input, pattern) >= self.config.default_threshold
    }

    pub fn confidence(&self, score: f64) -> MatchConfidence {
        if score >= self.config.high_threshold {
            MatchConfidence::High
        } else if score >= self.config.default_threshold {
            MatchConfidence::Good
        } else if score >= self.config.keyword_threshold {
            MatchConfidence::Partial
        } else {
            MatchConfidence::None
        }
    }

    /// Keyword-boosted similarity with particle keywords dropped.
    pub fn keyword_similarity<K: AsRef<str>>(
        &self,
        input: &str,
        pattern: &str,
        keywords: &[K],
    ) -> f64 {
        let input = normalize(input);
        self.keyword_score(&input, &normalize(pattern), keywords)
    }

    fn keyword_score<K: AsRef<str>>(&self, input: &str, pattern: &str, keywords: &[K]) -> f64 {
        let base = similarity_normalized(input, pattern);
        let content = keywords
            .iter()
            .map(|k| k.as_ref())
            .filter(|k| !self.config.is_particle(k.trim()));
        (base + keyword_bonus(input, content)).min(1.0)
    }

    /// True if the normalized lengths differ by at most `max_length_diff`.
    pub fn within_length(&self, input: &str, pattern: &str) -> bool {
        normalized_len(input).abs_diff(normalized_len(pattern)) <= self.config.max_length_diff
    }

    /// Best keyword-boosted candidate at or above `keyword_threshold`.
    ///
    /// Candidates too far apart in length are skipped; the returned index
    /// still refers to the position in `candidates`.
    pub fn best_match<'a, I, K>(&self, input: &str, candidates: I) -> Option<BestMatch>
    where
        I: IntoIterator<Item = (&'a str, &'a [K])>,
        K: AsRef<str> + 'a,
    {
        let input = normalize(input);

        let mut best: Option<BestMatch> = None;
        for (index, (pattern, keywords)) in candidates.into_iter().enumerate() {
            let pattern = normalize(pattern);
            if !self.within_length(&input, &pattern) {
                continue;
            }
            let score = self.keyword_score(&input, &pattern, keywords);
            if best.map_or(true, |b| score > b.score) {
                best = Some(BestMatch { index, score });
            }
        }

        let best = best.filter(|b| b.score >= self.config.keyword_threshold);
        match best {
            Some(b) => log::debug!("Best match #{} score {:.3}", b.index, b.score),
            None => log::debug!("No pattern above {:.2}", self.config.keyword_threshold),
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MENU: [&str; 3] = ["ラーメンをください", "お水をください", "いくらですか"];

    #[test]
    fn test_find_best_match_exact() {
        let m = find_best_match("ラーメンをください", &MENU, Some(0.8)).unwrap();
        assert_eq!(m.index, 0);
        assert_eq!(m.score, 1.0);
    }

    #[test]
    fn test_find_best_match_default_threshold() {
        assert!(find_best_match("いくらですか", &MENU, None).is_some());
        assert!(find_best_match("トイレはどこですか", &MENU, None).is_none());
    }

    #[test]
    fn test_find_best_match_empty_candidates() {
        let empty: [&str; 0] = [];
        assert!(find_best_match("お水", &empty, Some(0.0)).is_none());
    }

    #[test]
    fn test_find_best_match_below_threshold() {
        let best = find_best_match("お水", &MENU, Some(0.0)).unwrap();
        assert!(find_best_match("お水", &MENU, Some(best.score + 0.01)).is_none());
        let at = find_best_match("お水", &MENU, Some(best.score)).unwrap();
        assert_eq!(at.index, best.index);
    }

    #[test]
    fn test_find_best_match_first_wins_ties() {
        let patterns = ["お茶", "お水", "お茶"];
        let m = find_best_match("お茶", &patterns, Some(0.5)).unwrap();
        assert_eq!(m.index, 0);

        // Two different patterns equally far from the input
        let patterns = ["abx", "aby"];
        let m = find_best_match("abz", &patterns, Some(0.0)).unwrap();
        assert_eq!(m.index, 0);
    }

    #[test]
    fn test_find_best_match_with_keywords() {
        let patterns = vec![
            ("お水をください", vec!["水"]),
            ("ラーメンをください", vec!["ラーメン"]),
        ];
        let m = find_best_match_with_keywords("ラーメンひとつください", &patterns, None).unwrap();
        assert_eq!(m.index, 1);
        assert_eq!(m.pattern, "ラーメンをください");
        assert!(m.score >= DEFAULT_KEYWORD_THRESHOLD);
    }

    #[test]
    fn test_find_best_match_with_keywords_none() {
        let patterns = vec![("お水をください", vec!["水"])];
        assert!(find_best_match_with_keywords("さようなら", &patterns, None).is_none());
        let empty: Vec<(&str, Vec<&str>)> = Vec::new();
        assert!(find_best_match_with_keywords("お水", &empty, Some(0.0)).is_none());
    }

    #[test]
    fn test_keyword_boost_changes_winner() {
        let input = "みずください";
        let patterns = vec![("みそください", vec![]), ("おみずをください", vec!["みず"])];
        let plain =
            find_best_match(input, &["みそください", "おみずをください"], Some(0.0)).unwrap();
        let boosted = find_best_match_with_keywords(input, &patterns, Some(0.0)).unwrap();
        assert_eq!(boosted.index, 1);
        assert!(boosted.score > plain.score || plain.index == 1);
    }

    #[test]
    fn test_confidence_bands() {
        let m = FuzzyMatcher::default();
        assert_eq!(m.confidence(0.95), MatchConfidence::High);
        assert_eq!(m.confidence(0.85), MatchConfidence::Good);
        assert_eq!(m.confidence(0.75), MatchConfidence::Partial);
        assert_eq!(m.confidence(0.5), MatchConfidence::None);
    }

    #[test]
    fn test_is_match_depends_on_profile() {
        // Scores about 0.71: above lenient (0.70), below strict (0.85)
        let input = "すみません、お水ください";
        let pattern = "すみません、お水をください";
        let strict = FuzzyMatcher::new(FuzzyMatcherConfig::strict());
        let lenient = FuzzyMatcher::new(FuzzyMatcherConfig::lenient());
        assert!(!strict.is_match(input, pattern));
        assert!(lenient.is_match(input, pattern));
    }

    #[test]
    fn test_keyword_similarity_ignores_particles() {
        let m = FuzzyMatcher::default();
        // "を" appears in the input but is a particle, so only "水" counts
        let with_particle = m.keyword_similarity("お茶をください", "お水をください", &["を", "水"]);
        let without = m.keyword_similarity("お茶をください", "お水をください", &["水"]);
        assert!((with_particle - without).abs() < 1e-9);
    }

    #[test]
    fn test_keyword_similarity_blank_keyword_counts_in_total() {
        let m = FuzzyMatcher::default();
        let base = m.similarity("お茶をください", "お水をください");
        let s = m.keyword_similarity("お茶をください", "お水をください", &["お茶", " "]);
        assert!((s - (base + 0.1)).abs() < 1e-9);
    }

    #[test]
    fn test_within_length() {
        let m = FuzzyMatcher::new(FuzzyMatcherConfig::strict());
        assert!(m.within_length("お水", "お水をください"));
        assert!(!m.within_length("お水", "すみません、お水をもう一杯ください"));
        // Lengths are measured after whitespace collapsing
        assert!(m.within_length("お水          を", "お水"));
    }

    #[test]
    fn test_best_match_skips_length_outliers() {
        let m = FuzzyMatcher::new(FuzzyMatcherConfig {
            max_length_diff: 2,
            ..FuzzyMatcherConfig::lenient()
        });
        let kw: Vec<String> = vec!["水".into()];
        let candidates: Vec<(&str, &[String])> = vec![
            ("お水をくださいませんか、お願いします", &kw[..]),
            ("お水をください", &kw[..]),
        ];
        let best = m.best_match("お水ください", candidates).unwrap();
        assert_eq!(best.index, 1);
    }

    #[test]
    fn test_best_match_none_when_all_filtered() {
        let m = FuzzyMatcher::new(FuzzyMatcherConfig {
            max_length_diff: 0,
            ..FuzzyMatcherConfig::default()
        });
        let kw: Vec<String> = Vec::new();
        let candidates: Vec<(&str, &[String])> = vec![("お水をください", &kw[..])];
        assert!(m.best_match("お水", candidates).is_none());
    }
}
