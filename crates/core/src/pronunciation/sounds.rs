use std::fmt;

use serde::{Deserialize, Serialize};

/// Sound classes that learners commonly get wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SoundType {
    RaGyou,
    TsuChu,
    LongVowel,
    DoubleConsonant,
    NSound,
    ShiChi,
    TsuSu,
    FuHu,
}

impl SoundType {
    pub const ALL: [SoundType; 8] = [
        SoundType::RaGyou,
        SoundType::TsuChu,
        SoundType::LongVowel,
        SoundType::DoubleConsonant,
        SoundType::NSound,
        SoundType::ShiChi,
        SoundType::TsuSu,
        SoundType::FuHu,
    ];

    /// Display name shown to learners.
    pub fn label(self) -> &'static str {
        match self {
            SoundType::RaGyou => "ら行",
            SoundType::TsuChu => "つ・ちゅ",
            SoundType::LongVowel => "長音",
            SoundType::DoubleConsonant => "促音（っ）",
            SoundType::NSound => "撥音（ん）",
            SoundType::ShiChi => "し・ち",
            SoundType::TsuSu => "つ・す",
            SoundType::FuHu => "ふ",
        }
    }
}

impl fmt::Display for SoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueType {
    WrongLength,
    WrongSound,
    UnclearArticulation,
}

/// Ordered from least to most serious.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        };
        f.write_str(s)
    }
}

/// One diagnostic finding against a mora sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblematicSound {
    pub sound_type: SoundType,
    /// Offending grapheme(s)
    pub mora: String,
    /// Index into the analyzed mora sequence
    pub position: usize,
    pub issue: IssueType,
    pub severity: Severity,
    pub suggestion: String,
    pub native_example: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn test_sound_type_serde_names() {
        let json = serde_json::to_string(&SoundType::DoubleConsonant).unwrap();
        assert_eq!(json, "\"DOUBLE_CONSONANT\"");
        let t: SoundType = serde_json::from_str("\"RA_GYOU\"").unwrap();
        assert_eq!(t, SoundType::RaGyou);
    }

    #[test]
    fn test_labels_are_distinct() {
        let labels: std::collections::HashSet<_> =
            SoundType::ALL.iter().map(|t| t.label()).collect();
        assert_eq!(labels.len(), SoundType::ALL.len());
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Critical.to_string(), "critical");
    }
}
