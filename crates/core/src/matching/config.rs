//! Named matcher profiles.
//!
//! A profile is chosen per scenario and swapped wholesale; nothing mutates
//! a config once it is built.

use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::KaiwaError;

/// Grammatical particles that carry no intent on their own.
const PARTICLES: &[&str] = &[
    "は", "が", "を", "に", "で", "と", "の", "へ", "も", "や", "か", "ね", "よ", "から", "まで",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyMatcherConfig {
    /// Minimum plain similarity for a match
    pub default_threshold: f64,
    /// Minimum keyword-boosted similarity for a match
    pub keyword_threshold: f64,
    /// Score at or above which a match is considered certain
    pub high_threshold: f64,
    /// Largest allowed difference in normalized character length
    pub max_length_diff: usize,
    pub particles: BTreeSet<String>,
}

impl Default for FuzzyMatcherConfig {
    fn default() -> Self {
        Self {
            default_threshold: 0.8,
            keyword_threshold: 0.7,
            high_threshold: 0.9,
            max_length_diff: 10,
            particles: default_particles(),
        }
    }
}

fn default_particles() -> BTreeSet<String> {
    PARTICLES.iter().map(|p| p.to_string()).collect()
}

impl FuzzyMatcherConfig {
    /// Higher thresholds for scenarios where a wrong canned reply is costly.
    pub fn strict() -> Self {
        Self {
            default_threshold: 0.85,
            keyword_threshold: 0.75,
            high_threshold: 0.95,
            max_length_diff: 5,
            ..Self::default()
        }
    }

    /// Lower thresholds for beginners.
    pub fn lenient() -> Self {
        Self {
            default_threshold: 0.7,
            keyword_threshold: 0.6,
            high_threshold: 0.85,
            max_length_diff: 15,
            ..Self::default()
        }
    }

    pub fn is_particle(&self, token: &str) -> bool {
        self.particles.contains(token)
    }

    pub fn validate(&self) -> std::result::Result<(), KaiwaError> {
        for (name, value) in [
            ("default_threshold", self.default_threshold),
            ("keyword_threshold", self.keyword_threshold),
            ("high_threshold", self.high_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(KaiwaError::InvalidConfig(format!(
                    "{name} = {value} is outside [0, 1]"
                )));
            }
        }
        Ok(())
    }

    /// Load a custom profile from JSON; absent fields take default values.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read matcher config: {}", path.display()))?;
        let config: Self = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse matcher config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatcherProfile {
    #[default]
    Default,
    Strict,
    Lenient,
}

impl MatcherProfile {
    pub fn config(self) -> FuzzyMatcherConfig {
        match self {
            MatcherProfile::Default => FuzzyMatcherConfig::default(),
            MatcherProfile::Strict => FuzzyMatcherConfig::strict(),
            MatcherProfile::Lenient => FuzzyMatcherConfig::lenient(),
        }
    }
}

impl FromStr for MatcherProfile {
    type Err = KaiwaError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(MatcherProfile::Default),
            "strict" => Ok(MatcherProfile::Strict),
            "lenient" => Ok(MatcherProfile::Lenient),
            _ => Err(KaiwaError::UnknownProfile(s.to_string())),
        }
    }
}
