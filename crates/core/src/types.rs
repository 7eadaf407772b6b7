use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::KaiwaError;

/// One timing unit of a spoken utterance, as produced by an acoustic
/// feature extractor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Mora {
    /// Kana grapheme(s), e.g. "ら", "っ", "きょ"
    pub text: String,
    /// Duration in milliseconds
    pub duration: f64,
    /// Offset from utterance start in milliseconds
    pub start_time: f64,
    /// Fundamental frequency in Hz (0 when unvoiced)
    #[serde(default)]
    pub pitch: f64,
    /// Normalized loudness in [0, 1]
    #[serde(default)]
    pub intensity: f64,
    /// High tone relative to the speaker's own contour
    #[serde(default)]
    pub is_high: bool,
}

impl Mora {
    /// Build a mora with timing only; pitch and intensity start at zero.
    pub fn new(text: impl Into<String>, start_time: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            duration,
            start_time,
            pitch: 0.0,
            intensity: 0.0,
            is_high: false,
        }
    }

    pub fn with_pitch(mut self, pitch: f64) -> Self {
        self.pitch = pitch;
        self
    }

    pub fn with_intensity(mut self, intensity: f64) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_high(mut self, is_high: bool) -> Self {
        self.is_high = is_high;
        self
    }

    /// End of the mora in milliseconds.
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }
}

/// Recording-level facts that accompany a mora sequence.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AudioFeatures {
    pub sample_rate: u32,
    /// Length of the recording in milliseconds
    pub duration_ms: f64,
}

/// Check that a mora sequence satisfies the extractor contract.
///
/// The analyzers never call this; they assume well-formed input.
pub fn validate_morae(morae: &[Mora]) -> std::result::Result<(), KaiwaError> {
    let mut prev_start = f64::NEG_INFINITY;
    for (i, m) in morae.iter().enumerate() {
        if !m.duration.is_finite() || m.duration < 0.0 {
            return Err(KaiwaError::invalid_mora(
                i,
                format!("duration {} is not a non-negative number", m.duration),
            ));
        }
        if !m.start_time.is_finite() || m.start_time < prev_start {
            return Err(KaiwaError::invalid_mora(
                i,
                format!("start time {} goes backwards", m.start_time),
            ));
        }
        if !(0.0..=1.0).contains(&m.intensity) {
            return Err(KaiwaError::invalid_mora(
                i,
                format!("intensity {} outside [0, 1]", m.intensity),
            ));
        }
        if !m.pitch.is_finite() || m.pitch < 0.0 {
            return Err(KaiwaError::invalid_mora(i, format!("pitch {} is negative", m.pitch)));
        }
        prev_start = m.start_time;
    }
    Ok(())
}

/// Read and validate a JSON array of morae.
pub fn load_morae(path: &Path) -> Result<Vec<Mora>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read mora file: {}", path.display()))?;
    let morae: Vec<Mora> = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse mora file: {}", path.display()))?;
    validate_morae(&morae)
        .with_context(|| format!("Malformed mora sequence in {}", path.display()))?;
    log::info!("Loaded {} morae from {}", morae.len(), path.display());
    Ok(morae)
}
