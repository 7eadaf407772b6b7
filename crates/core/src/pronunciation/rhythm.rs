//! Speaking-speed and rhythm evaluation of a mora sequence, optionally
//! against a native reference recording.

use serde::{Deserialize, Serialize};

use crate::types::Mora;

use super::dtw::rhythm_similarity;

/// Average mora length of a native speaker at conversational pace.
pub const NATIVE_MORA_MS: f64 = 120.0;
/// Inter-mora gaps longer than this count as pauses.
pub const PAUSE_THRESHOLD_MS: f64 = 200.0;
/// One pause is expected per this many morae.
const MORAE_PER_EXPECTED_PAUSE: f64 = 8.0;

const SPEED_WEIGHT: f64 = 0.4;
const RHYTHM_WEIGHT: f64 = 0.4;
const PAUSE_WEIGHT: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpeedRating {
    TooSlow,
    Slow,
    Natural,
    Fast,
    TooFast,
}

/// Comparison of one utterance against a native recording of the same text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeComparison {
    pub native_duration: f64,
    pub user_duration: f64,
    /// user / native total duration
    pub speed_ratio: f64,
    /// DTW-based timing-shape similarity, 0-100
    pub rhythm_similarity: f64,
    /// Share of aligned morae with matching high/low tone, 0-100
    pub pitch_similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RhythmAnalysis {
    pub total_duration: f64,
    pub average_mora_duration: f64,
    pub mora_durations: Vec<f64>,
    pub speed_rating: SpeedRating,
    /// Consistency of mora timing, 0-100
    pub rhythm_score: f64,
    /// Offsets (ms) where a pause begins
    pub pause_locations: Vec<f64>,
    /// Weighted composite, 0-100
    pub naturalness: f64,
    pub comparison: Option<NativeComparison>,
}

/// Span from the first mora's start to the last mora's end.
pub fn total_duration(morae: &[Mora]) -> f64 {
    match (morae.first(), morae.last()) {
        (Some(first), Some(last)) => (last.end_time() - first.start_time).max(0.0),
        _ => 0.0,
    }
}

pub fn average_duration(durations: &[f64]) -> f64 {
    if durations.is_empty() {
        return 0.0;
    }
    durations.iter().sum::<f64>() / durations.len() as f64
}

/// Band `average / NATIVE_MORA_MS`, checked in the order
/// <0.6, <0.8, >1.5, >1.2.
pub fn classify_speed(average_mora_ms: f64) -> SpeedRating {
    let ratio = average_mora_ms / NATIVE_MORA_MS;
    if ratio < 0.6 {
        SpeedRating::TooSlow
    } else if ratio < 0.8 {
        SpeedRating::Slow
    } else if ratio > 1.5 {
        SpeedRating::TooFast
    } else if ratio > 1.2 {
        SpeedRating::Fast
    } else {
        SpeedRating::Natural
    }
}

/// Score the coefficient of variation of mora durations.
///
/// CV below 0.3 is perfect, 0.3-0.5 falls linearly to 70, beyond that
/// drops 50 points per unit of CV.
pub fn rhythm_score(durations: &[f64]) -> f64 {
    if durations.len() < 2 {
        return 100.0;
    }
    let mean = average_duration(durations);
    if mean <= 0.0 {
        return 100.0;
    }
    let variance =
        durations.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / durations.len() as f64;
    let cv = variance.sqrt() / mean;

    let score = if cv < 0.3 {
        100.0
    } else if cv < 0.5 {
        100.0 - (cv - 0.3) / 0.2 * 30.0
    } else {
        (70.0 - (cv - 0.5) * 50.0).max(0.0)
    };
    score.clamp(0.0, 100.0)
}

/// Start offsets of gaps longer than [`PAUSE_THRESHOLD_MS`].
pub fn find_pauses(morae: &[Mora]) -> Vec<f64> {
    morae
        .windows(2)
        .filter_map(|w| {
            let gap_start = w[0].end_time();
            let gap = w[1].start_time - gap_start;
            (gap > PAUSE_THRESHOLD_MS).then_some(gap_start)
        })
        .collect()
}

pub fn speed_naturalness(average_mora_ms: f64) -> f64 {
    let diff = (average_mora_ms - NATIVE_MORA_MS).abs();
    if diff < 30.0 {
        100.0
    } else if diff < 60.0 {
        100.0 - (diff - 30.0) / 30.0 * 30.0
    } else {
        (70.0 - (diff - 60.0) / 10.0).max(0.0)
    }
}

pub fn pause_naturalness(mora_count: usize, pause_count: usize) -> f64 {
    let expected = mora_count as f64 / MORAE_PER_EXPECTED_PAUSE;
    (100.0 - (pause_count as f64 - expected).abs() * 10.0).max(0.0)
}

/// Compare a learner's morae against a native recording.
pub fn compare_with_native(user: &[Mora], native: &[Mora]) -> NativeComparison {
    let user_duration = total_duration(user);
    let native_duration = total_duration(native);
    let speed_ratio = if native_duration > 0.0 {
        user_duration / native_duration
    } else {
        0.0
    };

    let user_durations: Vec<f64> = user.iter().map(|m| m.duration).collect();
    let native_durations: Vec<f64> = native.iter().map(|m| m.duration).collect();

    NativeComparison {
        native_duration,
        user_duration,
        speed_ratio,
        rhythm_similarity: rhythm_similarity(&user_durations, &native_durations),
        pitch_similarity: pitch_similarity(user, native),
    }
}

/// Percentage of positions (up to the shorter length) whose tone agrees.
pub fn pitch_similarity(user: &[Mora], native: &[Mora]) -> f64 {
    let compared = user.len().min(native.len());
    if compared == 0 {
        return 0.0;
    }
    let agree = user
        .iter()
        .zip(native)
        .filter(|(u, n)| u.is_high == n.is_high)
        .count();
    agree as f64 / compared as f64 * 100.0
}

/// Evaluate timing of `morae`, comparing against `native` when given.
pub fn analyze(morae: &[Mora], native: Option<&[Mora]>) -> RhythmAnalysis {
    let mora_durations: Vec<f64> = morae.iter().map(|m| m.duration).collect();
    let average_mora_duration = average_duration(&mora_durations);
    let speed_rating = classify_speed(average_mora_duration);
    let rhythm_score = rhythm_score(&mora_durations);
    let pause_locations = find_pauses(morae);

    let naturalness = SPEED_WEIGHT * speed_naturalness(average_mora_duration)
        + RHYTHM_WEIGHT * rhythm_score
        + PAUSE_WEIGHT * pause_naturalness(morae.len(), pause_locations.len());

    let comparison = native.map(|n| compare_with_native(morae, n));

    log::debug!(
        "Rhythm: {} morae, avg {:.1}ms, {:?}, rhythm {:.1}, {} pauses, naturalness {:.1}",
        morae.len(),
        average_mora_duration,
        speed_rating,
        rhythm_score,
        pause_locations.len(),
        naturalness
    );

    RhythmAnalysis {
        total_duration: total_duration(morae),
        average_mora_duration,
        mora_durations,
        speed_rating,
        rhythm_score,
        pause_locations,
        naturalness,
        comparison,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Back-to-back morae with the given durations.
    fn timeline(durations: &[f64]) -> Vec<Mora> {
        let mut t = 0.0;
        durations
            .iter()
            .map(|&d| {
                let m = Mora::new("か", t, d);
                t += d;
                m
            })
            .collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_analyze_uniform_native_pace() {
        let a = analyze(&timeline(&[120.0; 5]), None);
        assert_eq!(a.speed_rating, SpeedRating::Natural);
        assert!(approx(a.rhythm_score, 100.0));
        assert!(approx(a.average_mora_duration, 120.0));
        assert!(approx(a.total_duration, 600.0));
        // pause term: 100 - 0.625 * 10
        assert!(approx(a.naturalness, 40.0 + 40.0 + 0.2 * 93.75));
        assert!(a.naturalness > 95.0);
        assert!(a.comparison.is_none());
        assert!(a.pause_locations.is_empty());
    }

    #[test]
    fn test_analyze_empty() {
        let a = analyze(&[], None);
        assert_eq!(a.average_mora_duration, 0.0);
        assert_eq!(a.total_duration, 0.0);
        assert!(approx(a.rhythm_score, 100.0));
        assert!(a.mora_durations.is_empty());
        assert!((0.0..=100.0).contains(&a.naturalness));
    }

    #[test]
    fn test_classify_speed_bands() {
        assert_eq!(classify_speed(60.0), SpeedRating::TooSlow); // 0.5
        assert_eq!(classify_speed(84.0), SpeedRating::Slow); // 0.7
        assert_eq!(classify_speed(120.0), SpeedRating::Natural);
        assert_eq!(classify_speed(144.0), SpeedRating::Natural); // 1.2 exactly
        assert_eq!(classify_speed(156.0), SpeedRating::Fast); // 1.3
        assert_eq!(classify_speed(190.0), SpeedRating::TooFast); // ~1.58
    }

    #[test]
    fn test_rhythm_score_identical_durations() {
        assert!(approx(rhythm_score(&[90.0, 90.0, 90.0]), 100.0));
    }

    #[test]
    fn test_rhythm_score_short_sequences() {
        assert!(approx(rhythm_score(&[]), 100.0));
        assert!(approx(rhythm_score(&[300.0]), 100.0));
        assert!(approx(rhythm_score(&[0.0, 0.0]), 100.0));
    }

    #[test]
    fn test_rhythm_score_interpolated() {
        // mean 100, population stddev 40: CV 0.4 -> 85
        assert!(approx(rhythm_score(&[60.0, 140.0]), 85.0));
    }

    #[test]
    fn test_rhythm_score_high_variation() {
        // mean 100, stddev 90: CV 0.9 -> 70 - 0.4 * 50 = 50
        assert!(approx(rhythm_score(&[10.0, 190.0]), 50.0));
    }

    #[test]
    fn test_rhythm_score_bounded() {
        let s = rhythm_score(&[1.0, 1.0, 1.0, 1.0, 1000.0]);
        assert!((0.0..=100.0).contains(&s));
        assert_eq!(s, 0.0);
    }

    #[test]
    fn test_pause_below_threshold() {
        let morae = vec![Mora::new("あ", 0.0, 100.0), Mora::new("い", 250.0, 100.0)];
        assert!(find_pauses(&morae).is_empty());
    }

    #[test]
    fn test_pause_detected_at_gap_start() {
        let morae = vec![Mora::new("あ", 0.0, 100.0), Mora::new("い", 350.0, 100.0)];
        assert_eq!(find_pauses(&morae), vec![100.0]);
    }

    #[test]
    fn test_pause_exactly_threshold_not_counted() {
        let morae = vec![Mora::new("あ", 0.0, 100.0), Mora::new("い", 300.0, 100.0)];
        assert!(find_pauses(&morae).is_empty());
    }

    #[test]
    fn test_speed_naturalness() {
        assert!(approx(speed_naturalness(120.0), 100.0));
        assert!(approx(speed_naturalness(149.0), 100.0));
        assert!(approx(speed_naturalness(165.0), 85.0)); // diff 45
        assert!(approx(speed_naturalness(200.0), 68.0)); // diff 80
        assert!(approx(speed_naturalness(2000.0), 0.0));
    }

    #[test]
    fn test_pause_naturalness() {
        assert!(approx(pause_naturalness(16, 2), 100.0));
        assert!(approx(pause_naturalness(8, 4), 70.0));
        assert!(approx(pause_naturalness(0, 20), 0.0));
    }

    #[test]
    fn test_compare_with_native_identical() {
        let morae: Vec<Mora> = timeline(&[100.0, 150.0, 100.0])
            .into_iter()
            .enumerate()
            .map(|(i, m)| m.with_high(i % 2 == 1))
            .collect();
        let c = compare_with_native(&morae, &morae);
        assert!(approx(c.speed_ratio, 1.0));
        assert!(approx(c.rhythm_similarity, 100.0));
        assert!(approx(c.pitch_similarity, 100.0));
    }

    #[test]
    fn test_compare_with_native_slower_user() {
        let user = timeline(&[200.0, 200.0]);
        let native = timeline(&[100.0, 100.0]);
        let c = compare_with_native(&user, &native);
        assert!(approx(c.user_duration, 400.0));
        assert!(approx(c.native_duration, 200.0));
        assert!(approx(c.speed_ratio, 2.0));
    }

    #[test]
    fn test_compare_with_empty_native() {
        let c = compare_with_native(&timeline(&[100.0]), &[]);
        assert_eq!(c.speed_ratio, 0.0);
        assert_eq!(c.rhythm_similarity, 0.0);
        assert_eq!(c.pitch_similarity, 0.0);
    }

    #[test]
    fn test_pitch_similarity_truncates() {
        let user = vec![
            Mora::new("は", 0.0, 100.0).with_high(false),
            Mora::new("し", 100.0, 100.0).with_high(true),
            Mora::new("が", 200.0, 100.0).with_high(true),
        ];
        let native = vec![
            Mora::new("は", 0.0, 100.0).with_high(true),
            Mora::new("し", 100.0, 100.0).with_high(true),
        ];
        assert!(approx(pitch_similarity(&user, &native), 50.0));
    }

    #[test]
    fn test_analyze_with_native() {
        let user = timeline(&[100.0, 140.0, 100.0]);
        let native = timeline(&[110.0, 130.0, 110.0]);
        let a = analyze(&user, Some(&native));
        let c = a.comparison.unwrap();
        assert!(approx(c.rhythm_similarity, 100.0));
        assert!(approx(c.pitch_similarity, 100.0));
    }
}
