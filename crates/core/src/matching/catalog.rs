//! Response cache: a read-only pattern catalog plus the caller-owned state
//! used to pick among response variants.

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::FuzzyMatcherConfig;
use super::matcher::{BestMatch, FuzzyMatcher, MatchConfidence};
use super::normalize::normalize;
use crate::error::{KaiwaError, Result};

const DEFAULT_MEMO_CAPACITY: usize = 64;

/// One canonical phrase with its intent keywords and reply variants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheEntry {
    pub pattern: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub responses: Vec<String>,
}

impl CacheEntry {
    pub fn new(pattern: &str, category: &str, keywords: &[&str], responses: &[&str]) -> Self {
        Self {
            pattern: pattern.to_string(),
            category: category.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            responses: responses.iter().map(|r| r.to_string()).collect(),
        }
    }
}

/// How a reply variant is chosen once a pattern matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseSelection {
    /// Uniformly at random
    #[default]
    Random,
    /// Weighted by `1 / (1 + uses)`, favouring variants heard less often
    LeastUsed,
}

impl FromStr for ResponseSelection {
    type Err = KaiwaError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(ResponseSelection::Random),
            "least-used" | "least_used" => Ok(ResponseSelection::LeastUsed),
            _ => Err(KaiwaError::UnknownSelection(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CachedResponse {
    pub entry_index: usize,
    pub variant_index: usize,
    pub pattern: String,
    pub category: String,
    pub response: String,
    pub score: f64,
    pub confidence: MatchConfidence,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Lookups answered from the memo without scanning the catalog
    pub memo_hits: u64,
    pub memo_len: usize,
}

/// Catalog plus usage counters and a bounded memo of recent utterances.
///
/// The catalog itself is never modified; only selection state changes.
#[derive(Debug)]
pub struct ResponseCache {
    entries: Vec<CacheEntry>,
    matcher: FuzzyMatcher,
    selection: ResponseSelection,
    usage: Vec<Vec<u32>>,
    memo: HashMap<String, Option<BestMatch>>,
    memo_order: VecDeque<String>,
    memo_capacity: usize,
    stats: CacheStats,
}

impl ResponseCache {
    /// Build a cache over `entries`. Every entry needs at least one response.
    pub fn new(entries: Vec<CacheEntry>, config: FuzzyMatcherConfig) -> Result<Self> {
        config.validate()?;
        if let Some(empty) = entries.iter().find(|e| e.responses.is_empty()) {
            return Err(KaiwaError::EmptyResponses {
                pattern: empty.pattern.clone(),
            });
        }
        let usage = entries.iter().map(|e| vec![0; e.responses.len()]).collect();
        Ok(Self {
            entries,
            matcher: FuzzyMatcher::new(config),
            selection: ResponseSelection::default(),
            usage,
            memo: HashMap::new(),
            memo_order: VecDeque::new(),
            memo_capacity: DEFAULT_MEMO_CAPACITY,
            stats: CacheStats::default(),
        })
    }

    pub fn with_selection(mut self, selection: ResponseSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Set the memo size; 0 disables memoization.
    pub fn with_memo_capacity(mut self, capacity: usize) -> Self {
        self.memo_capacity = capacity;
        while self.memo_order.len() > capacity {
            if let Some(old) = self.memo_order.pop_front() {
                self.memo.remove(&old);
            }
        }
        self
    }

    pub fn entries(&self) -> &[CacheEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn matcher(&self) -> &FuzzyMatcher {
        &self.matcher
    }

    /// Usage counts of each response variant of entry `index`.
    pub fn usage(&self, index: usize) -> &[u32] {
        self.usage.get(index).map(|u| u.as_slice()).unwrap_or(&[])
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            memo_len: self.memo.len(),
            ..self.stats
        }
    }

    /// Best catalog entry for `input`, consulting the memo first.
    pub fn find(&mut self, input: &str) -> Option<BestMatch> {
        let key = normalize(input);
        if let Some(cached) = self.memo.get(&key) {
            self.stats.memo_hits += 1;
            return *cached;
        }

        let found = self.matcher.best_match(
            &key,
            self.entries
                .iter()
                .map(|e| (e.pattern.as_str(), e.keywords.as_slice())),
        );
        self.remember(key, found);
        found
    }

    fn remember(&mut self, key: String, found: Option<BestMatch>) {
        if self.memo_capacity == 0 {
            return;
        }
        if self.memo_order.len() >= self.memo_capacity {
            if let Some(old) = self.memo_order.pop_front() {
                self.memo.remove(&old);
            }
        }
        self.memo_order.push_back(key.clone());
        self.memo.insert(key, found);
    }

    /// Match `input` and pick a response variant.
    pub fn lookup<R: Rng + ?Sized>(&mut self, input: &str, rng: &mut R) -> Option<CachedResponse> {
        let Some(best) = self.find(input) else {
            self.stats.misses += 1;
            log::info!("Cache miss: '{}'", input.trim());
            return None;
        };
        self.stats.hits += 1;

        let variant_index = self.select_variant(best.index, rng);
        self.usage[best.index][variant_index] += 1;

        let entry = &self.entries[best.index];
        log::info!(
            "Cache hit: '{}' -> '{}' (score {:.3}, variant {})",
            input.trim(),
            entry.pattern,
            best.score,
            variant_index
        );

        Some(CachedResponse {
            entry_index: best.index,
            variant_index,
            pattern: entry.pattern.clone(),
            category: entry.category.clone(),
            response: entry.responses[variant_index].clone(),
            score: best.score,
            confidence: self.matcher.confidence(best.score),
        })
    }

    fn select_variant<R: Rng + ?Sized>(&self, entry_index: usize, rng: &mut R) -> usize {
        let counts = &self.usage[entry_index];
        if counts.is_empty() {
            return 0;
        }
        match self.selection {
            ResponseSelection::Random => rng.gen_range(0..counts.len()),
            ResponseSelection::LeastUsed => {
                let weights = counts.iter().map(|&c| 1.0 / (1.0 + c as f64));
                match WeightedIndex::new(weights) {
                    Ok(dist) => dist.sample(rng),
                    Err(_) => 0,
                }
            }
        }
    }
}

/// Read a JSON array of catalog entries.
pub fn load_catalog(path: &Path) -> anyhow::Result<Vec<CacheEntry>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
    let entries: Vec<CacheEntry> = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse catalog: {}", path.display()))?;
    log::info!("Loaded {} catalog entries from {}", entries.len(), path.display());
    Ok(entries)
}
