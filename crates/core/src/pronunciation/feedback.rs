//! Standalone timing/pitch diagnostics and learner-facing advice.

use crate::types::Mora;

use super::rhythm::{RhythmAnalysis, SpeedRating};

const MONOTONE_MIN_MORAE: usize = 3;
/// A mora within this fraction of the mean pitch counts as flat.
const MONOTONE_DEVIATION: f64 = 0.1;
const MONOTONE_SHARE: f64 = 0.9;
const RUSHED_AVERAGE_MS: f64 = 80.0;
const RUSHED_MORA_MS: f64 = 60.0;
/// Pauses per mora above which the utterance sounds fragmented.
const PAUSE_RATIO_LIMIT: f64 = 0.25;

/// True if at least 90% of morae sit within 10% of the mean pitch.
///
/// Needs three or more morae and a positive mean pitch.
pub fn detect_monotone(morae: &[Mora]) -> bool {
    if morae.len() < MONOTONE_MIN_MORAE {
        return false;
    }
    let mean = morae.iter().map(|m| m.pitch).sum::<f64>() / morae.len() as f64;
    if mean <= 0.0 {
        return false;
    }
    let flat = morae
        .iter()
        .filter(|m| (m.pitch - mean).abs() / mean < MONOTONE_DEVIATION)
        .count();
    flat as f64 / morae.len() as f64 >= MONOTONE_SHARE
}

/// True if the average mora is under 80ms and more than half the morae are
/// individually under 60ms.
pub fn detect_rushed_speech(morae: &[Mora]) -> bool {
    if morae.is_empty() {
        return false;
    }
    let average = morae.iter().map(|m| m.duration).sum::<f64>() / morae.len() as f64;
    let short = morae.iter().filter(|m| m.duration < RUSHED_MORA_MS).count();
    average < RUSHED_AVERAGE_MS && short as f64 > morae.len() as f64 / 2.0
}

/// Advice strings for an analysis, in a fixed order: speed, rhythm,
/// pauses, then overall praise if nothing else applied.
pub fn get_suggestions(analysis: &RhythmAnalysis) -> Vec<String> {
    let mut out = Vec::new();

    match analysis.speed_rating {
        SpeedRating::TooSlow => {
            out.push("話すスピードがとても遅いです。もう少しテンポよく話してみましょう。")
        }
        SpeedRating::Slow => out.push("少しゆっくりです。ネイティブの速さに近づけてみましょう。"),
        SpeedRating::Fast => out.push("少し速いです。一拍ずつ丁寧に発音しましょう。"),
        SpeedRating::TooFast => {
            out.push("話すスピードが速すぎます。落ち着いて、はっきり話しましょう。")
        }
        SpeedRating::Natural => {}
    }

    if analysis.rhythm_score < 50.0 {
        out.push(
            "リズムが不安定です。手拍子に合わせて一拍ずつ同じ長さで発音する練習をしましょう。",
        );
    } else if analysis.rhythm_score < 70.0 {
        out.push("拍の長さに少しばらつきがあります。各拍をそろえることを意識しましょう。");
    }

    let mora_count = analysis.mora_durations.len();
    if mora_count > 0 {
        let pause_ratio = analysis.pause_locations.len() as f64 / mora_count as f64;
        if pause_ratio > PAUSE_RATIO_LIMIT {
            out.push("途中で止まる回数が多いです。文のまとまりごとに続けて話してみましょう。");
        }
    }

    if out.is_empty() && analysis.naturalness >= 80.0 {
        out.push("とても自然なリズムです。この調子で続けましょう。");
    }

    out.into_iter().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pronunciation::rhythm::analyze;

    fn pitched(pitches: &[f64]) -> Vec<Mora> {
        pitches
            .iter()
            .enumerate()
            .map(|(i, &p)| Mora::new("あ", i as f64 * 100.0, 100.0).with_pitch(p))
            .collect()
    }

    fn timed(durations: &[f64]) -> Vec<Mora> {
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

    #[test]
    fn test_monotone_flat_pitch() {
        assert!(detect_monotone(&pitched(&[200.0, 205.0, 198.0, 202.0])));
    }

    #[test]
    fn test_monotone_varied_pitch() {
        assert!(!detect_monotone(&pitched(&[150.0, 250.0, 180.0, 260.0])));
    }

    #[test]
    fn test_monotone_needs_three_morae() {
        assert!(!detect_monotone(&pitched(&[200.0, 200.0])));
    }

    #[test]
    fn test_monotone_unvoiced() {
        assert!(!detect_monotone(&pitched(&[0.0, 0.0, 0.0])));
    }

    #[test]
    fn test_rushed_speech() {
        assert!(detect_rushed_speech(&timed(&[50.0, 55.0, 70.0, 50.0])));
        // Average under 80 but only half are under 60
        assert!(!detect_rushed_speech(&timed(&[50.0, 50.0, 100.0, 100.0])));
        assert!(!detect_rushed_speech(&timed(&[120.0, 120.0])));
        assert!(!detect_rushed_speech(&[]));
    }

    #[test]
    fn test_suggestions_natural_praise() {
        let a = analyze(&timed(&[120.0; 8]), None);
        let s = get_suggestions(&a);
        assert_eq!(s.len(), 1);
        assert!(s[0].contains("自然"));
    }

    #[test]
    fn test_suggestions_order() {
        // Uneven morae with long gaps between them
        let morae = vec![
            Mora::new("か", 0.0, 10.0),
            Mora::new("き", 300.0, 90.0),
            Mora::new("く", 700.0, 10.0),
            Mora::new("け", 1000.0, 90.0),
        ];
        let a = analyze(&morae, None);
        assert_eq!(a.speed_rating, SpeedRating::TooSlow);
        let s = get_suggestions(&a);
        assert_eq!(s.len(), 3);
        assert!(s[0].contains("スピード"));
        assert!(s[1].contains("ばらつき"));
        assert!(s[2].contains("止まる"));
    }

    #[test]
    fn test_suggestions_empty_analysis() {
        let a = analyze(&[], None);
        let s = get_suggestions(&a);
        assert_eq!(s.len(), 1);
        assert!(s[0].contains("スピード"));
    }
}
