//! Rule battery for known difficult Japanese sounds.
//!
//! Each rule looks at one mora (and, for long vowels, the mora before it)
//! and yields at most one finding. Rules are independent, so a single mora
//! can be flagged by several of them.

use crate::types::{AudioFeatures, Mora};

use super::kana::{is_long_vowel_pair, is_one_of};
use super::sounds::{IssueType, ProblematicSound, Severity, SoundType};

const RA_ROW: &[&str] = &["ら", "り", "る", "れ", "ろ"];
const TSU_CHU: &[&str] = &["つ", "ちゅ"];
const SOKUON: &[&str] = &["っ"];
const HATSUON: &[&str] = &["ん"];
const SHI_CHI: &[&str] = &["し", "ち"];
const TSU_SU: &[&str] = &["つ", "す"];
const FU: &[&str] = &["ふ"];

/// A flap longer than this is held, not tapped.
const RA_MAX_MS: f64 = 120.0;
/// Below this pitch a ら-row mora is heard as a retroflex English R.
const RA_MIN_PITCH_HZ: f64 = 150.0;
const TSU_MAX_MS: f64 = 140.0;
/// (previous + current) / previous must reach this for a held vowel.
const LONG_VOWEL_MIN_RATIO: f64 = 1.8;
const LONG_VOWEL_CRITICAL_RATIO: f64 = 1.3;
const LONG_VOWEL_HIGH_RATIO: f64 = 1.5;
const SOKUON_MIN_MS: f64 = 80.0;
const SOKUON_MAX_MS: f64 = 200.0;
const SOKUON_MAX_INTENSITY: f64 = 0.3;
const HATSUON_MIN_MS: f64 = 60.0;
const HATSUON_MAX_INTENSITY: f64 = 0.7;
const SHI_MIN_MS: f64 = 80.0;
const TSU_FRICATIVE_MS: f64 = 130.0;
const FU_MAX_INTENSITY: f64 = 0.8;

type Rule = fn(&[Mora], usize) -> Option<ProblematicSound>;

/// Rules in evaluation order. For equal severities, findings keep mora order
/// first and this order second.
const RULES: &[Rule] = &[
    check_ra_gyou,
    check_tsu_chu,
    check_long_vowel,
    check_double_consonant,
    check_n_sound,
    check_shi_chi,
    check_tsu_su,
    check_fu,
];

fn finding(
    sound_type: SoundType,
    mora: &str,
    position: usize,
    issue: IssueType,
    severity: Severity,
    suggestion: &str,
    native_example: &str,
) -> Option<ProblematicSound> {
    Some(ProblematicSound {
        sound_type,
        mora: mora.to_string(),
        position,
        issue,
        severity,
        suggestion: suggestion.to_string(),
        native_example: native_example.to_string(),
    })
}

fn check_ra_gyou(morae: &[Mora], i: usize) -> Option<ProblematicSound> {
    let m = &morae[i];
    if !is_one_of(&m.text, RA_ROW) {
        return None;
    }
    if m.duration > RA_MAX_MS {
        return finding(
            SoundType::RaGyou,
            &m.text,
            i,
            IssueType::WrongLength,
            Severity::Medium,
            "ら行が長すぎます。舌先で上の歯茎を一回だけ軽くはじいてください。",
            "ありがとう",
        );
    }
    if m.pitch < RA_MIN_PITCH_HZ {
        return finding(
            SoundType::RaGyou,
            &m.text,
            i,
            IssueType::WrongSound,
            Severity::High,
            "英語のRのように舌を巻かないでください。日本語のら行は軽いはじき音です。",
            "りんご",
        );
    }
    None
}

fn check_tsu_chu(morae: &[Mora], i: usize) -> Option<ProblematicSound> {
    let m = &morae[i];
    if !is_one_of(&m.text, TSU_CHU) {
        return None;
    }
    if is_one_of(&m.text, &["つ"]) && m.duration > TSU_MAX_MS {
        return finding(
            SoundType::TsuChu,
            &m.text,
            i,
            IssueType::WrongLength,
            Severity::Medium,
            "「つ」が長すぎます。「ちゅ」にならないよう、短く鋭く発音してください。",
            "つくえ",
        );
    }
    None
}

fn check_long_vowel(morae: &[Mora], i: usize) -> Option<ProblematicSound> {
    if i == 0 {
        return None;
    }
    let prev = &morae[i - 1];
    let cur = &morae[i];
    if !is_long_vowel_pair(&prev.text, &cur.text) || prev.duration <= 0.0 {
        return None;
    }

    let ratio = (prev.duration + cur.duration) / prev.duration;
    if ratio >= LONG_VOWEL_MIN_RATIO {
        return None;
    }
    let severity = if ratio < LONG_VOWEL_CRITICAL_RATIO {
        Severity::Critical
    } else if ratio < LONG_VOWEL_HIGH_RATIO {
        Severity::High
    } else {
        Severity::Medium
    };
    let text = format!("{}{}", prev.text, cur.text);
    finding(
        SoundType::LongVowel,
        &text,
        i,
        IssueType::WrongLength,
        severity,
        "長音が短すぎます。母音を二拍分しっかり伸ばしてください（「おばさん」と「おばあさん」は別の言葉です）。",
        "おばあさん",
    )
}

fn check_double_consonant(morae: &[Mora], i: usize) -> Option<ProblematicSound> {
    let m = &morae[i];
    if !is_one_of(&m.text, SOKUON) {
        return None;
    }
    if m.duration < SOKUON_MIN_MS {
        return finding(
            SoundType::DoubleConsonant,
            &m.text,
            i,
            IssueType::WrongLength,
            Severity::High,
            "促音が短すぎます。一拍分しっかり止めてから次の音を出してください。",
            "きって",
        );
    }
    if m.duration > SOKUON_MAX_MS {
        return finding(
            SoundType::DoubleConsonant,
            &m.text,
            i,
            IssueType::WrongLength,
            Severity::Medium,
            "促音が長すぎます。止める時間は一拍分だけにしてください。",
            "がっこう",
        );
    }
    if m.intensity > SOKUON_MAX_INTENSITY {
        return finding(
            SoundType::DoubleConsonant,
            &m.text,
            i,
            IssueType::WrongSound,
            Severity::Medium,
            "促音の間は声を出さず、ほぼ無音にしてください。",
            "ざっし",
        );
    }
    None
}

fn check_n_sound(morae: &[Mora], i: usize) -> Option<ProblematicSound> {
    let m = &morae[i];
    if !is_one_of(&m.text, HATSUON) {
        return None;
    }
    if m.duration < HATSUON_MIN_MS {
        return finding(
            SoundType::NSound,
            &m.text,
            i,
            IssueType::WrongLength,
            Severity::Medium,
            "「ん」が短すぎます。「ん」は独立した一拍として発音してください。",
            "こんにちは",
        );
    }
    if m.intensity > HATSUON_MAX_INTENSITY {
        return finding(
            SoundType::NSound,
            &m.text,
            i,
            IssueType::UnclearArticulation,
            Severity::Low,
            "「ん」の鼻音が足りません。鼻から息を抜くように発音してください。",
            "しんぶん",
        );
    }
    None
}

fn check_shi_chi(morae: &[Mora], i: usize) -> Option<ProblematicSound> {
    let m = &morae[i];
    if !is_one_of(&m.text, SHI_CHI) {
        return None;
    }
    if is_one_of(&m.text, &["し"]) && m.duration < SHI_MIN_MS {
        return finding(
            SoundType::ShiChi,
            &m.text,
            i,
            IssueType::UnclearArticulation,
            Severity::Low,
            "「し」が短くて「ち」に聞こえます。息を長めに流してください。",
            "しち",
        );
    }
    None
}

fn check_tsu_su(morae: &[Mora], i: usize) -> Option<ProblematicSound> {
    let m = &morae[i];
    if !is_one_of(&m.text, TSU_SU) {
        return None;
    }
    if is_one_of(&m.text, &["つ"]) && m.duration > TSU_FRICATIVE_MS {
        return finding(
            SoundType::TsuSu,
            &m.text,
            i,
            IssueType::WrongSound,
            Severity::Medium,
            "「つ」が「す」のように聞こえます。舌先で一度止めてから破裂させてください。",
            "つき",
        );
    }
    None
}

fn check_fu(morae: &[Mora], i: usize) -> Option<ProblematicSound> {
    let m = &morae[i];
    if !is_one_of(&m.text, FU) {
        return None;
    }
    if m.intensity > FU_MAX_INTENSITY {
        return finding(
            SoundType::FuHu,
            &m.text,
            i,
            IssueType::WrongSound,
            Severity::Low,
            "「ふ」が強すぎます。両唇を軽く近づけ、やさしく息を出してください。",
            "ふじさん",
        );
    }
    None
}

/// Run every rule over every mora and return the findings, most severe first.
///
/// Equal severities keep encounter order. `text` and `features` describe
/// the recording and do not affect which rules fire.
pub fn detect(morae: &[Mora], text: &str, features: &AudioFeatures) -> Vec<ProblematicSound> {
    if let Some(last) = morae.last() {
        if features.duration_ms > 0.0 && last.end_time() > features.duration_ms {
            log::warn!(
                "Mora timeline ends at {:.0}ms, past the {:.0}ms recording",
                last.end_time(),
                features.duration_ms
            );
        }
    }

    let mut findings: Vec<ProblematicSound> = (0..morae.len())
        .flat_map(|i| RULES.iter().filter_map(move |rule| rule(morae, i)))
        .collect();
    findings.sort_by(|a, b| b.severity.cmp(&a.severity));

    for f in &findings {
        log::debug!(
            "{} at {} ('{}'): {:?}/{}",
            f.sound_type,
            f.position,
            f.mora,
            f.issue,
            f.severity
        );
    }
    log::debug!("'{}': {} morae, {} findings", text, morae.len(), findings.len());
    findings
}
