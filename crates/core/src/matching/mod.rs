//! Fuzzy matching of learner utterances against cached conversation patterns.

pub mod catalog;
pub mod config;
pub mod matcher;
pub mod normalize;
pub mod similarity;

pub use catalog::{CacheEntry, CachedResponse, ResponseCache, ResponseSelection};
pub use config::{FuzzyMatcherConfig, MatcherProfile};
pub use matcher::{
    find_best_match, find_best_match_with_keywords, BestMatch, FuzzyMatcher, KeywordMatch,
    MatchConfidence,
};
pub use similarity::{calculate_similarity, calculate_similarity_with_keywords, edit_distance};
