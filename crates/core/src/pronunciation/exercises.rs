//! Canned practice drills, one per sound class.

use serde::Serialize;

use super::sounds::{ProblematicSound, SoundType};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PracticeExercise {
    pub sound_type: SoundType,
    pub title: String,
    pub description: String,
    pub example_words: Vec<String>,
    /// Word pairs that differ only in the target sound
    pub minimal_pairs: Vec<(String, String)>,
    pub tips: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items.iter().map(|(a, b)| (a.to_string(), b.to_string())).collect()
}

fn build(
    sound_type: SoundType,
    title: &str,
    description: &str,
    words: &[&str],
    minimal: &[(&str, &str)],
    tips: &[&str],
) -> PracticeExercise {
    PracticeExercise {
        sound_type,
        title: title.to_string(),
        description: description.to_string(),
        example_words: strings(words),
        minimal_pairs: pairs(minimal),
        tips: strings(tips),
    }
}

/// The drill for one sound class.
pub fn exercise_for(sound_type: SoundType) -> PracticeExercise {
    match sound_type {
        SoundType::RaGyou => build(
            sound_type,
            "ら行のはじき音",
            "舌先で上の歯茎を一回だけ軽くはじく練習です。",
            &["ありがとう", "りんご", "くるま", "れきし", "ろうか"],
            &[("れい", "えい"), ("らく", "だく")],
            &["舌を巻かない", "「だ」と「ら」の中間を意識する", "一瞬で離す"],
        ),
        SoundType::TsuChu => build(
            sound_type,
            "「つ」と「ちゅ」の区別",
            "「つ」を短く鋭く、「ちゅ」と混ざらないように発音する練習です。",
            &["つくえ", "なつ", "ちゅうい", "つなみ"],
            &[("つうしん", "ちゅうしん"), ("つき", "ちゅき")],
            &["舌先を歯の裏に付けて始める", "唇を丸めすぎない"],
        ),
        SoundType::LongVowel => build(
            sound_type,
            "長音の長さ",
            "母音を二拍分伸ばし、短い母音との違いをはっきりさせる練習です。",
            &["おばあさん", "とうきょう", "せんせい", "ラーメン"],
            &[("おばさん", "おばあさん"), ("ビル", "ビール"), ("ここ", "こうこう")],
            &["手拍子で拍を数える", "伸ばす音も一拍として数える"],
        ),
        SoundType::DoubleConsonant => build(
            sound_type,
            "促音（っ）の間",
            "一拍分の無音をしっかり作る練習です。",
            &["きって", "がっこう", "ざっし", "いっぱい"],
            &[("きて", "きって"), ("さか", "さっか"), ("おと", "おっと")],
            &["息を止めて一拍待つ", "「っ」で声を出さない", "次の子音を強く出しすぎない"],
        ),
        SoundType::NSound => build(
            sound_type,
            "撥音（ん）の一拍",
            "「ん」を独立した一拍として鼻から響かせる練習です。",
            &["こんにちは", "しんぶん", "てんき", "ほん"],
            &[("かにゅう", "かんにゅう"), ("たい", "たんい")],
            &["「ん」でも拍を数える", "口を閉じすぎず鼻に響かせる"],
        ),
        SoundType::ShiChi => build(
            sound_type,
            "「し」と「ち」の区別",
            "摩擦音の「し」と破擦音の「ち」を言い分ける練習です。",
            &["しち", "しお", "ちず", "したしい"],
            &[("しかく", "ちかく"), ("しず", "ちず")],
            &["「し」は息を流し続ける", "「ち」は一度止めてから出す"],
        ),
        SoundType::TsuSu => build(
            sound_type,
            "「つ」と「す」の区別",
            "破裂を伴う「つ」と摩擦だけの「す」を言い分ける練習です。",
            &["つき", "すし", "つくる", "すこし"],
            &[("つき", "すき"), ("つる", "する")],
            &["「つ」は舌先で一度止める", "「す」は舌を付けずに息を流す"],
        ),
        SoundType::FuHu => build(
            sound_type,
            "やさしい「ふ」",
            "両唇を軽く近づけて息を出す「ふ」の練習です。",
            &["ふじさん", "ふく", "ふゆ", "とうふ"],
            &[("ふく", "ほく")],
            &["下唇を噛まない", "ろうそくを吹き消すようにやさしく"],
        ),
    }
}

/// One exercise per distinct sound class in `findings`, in order of first
/// appearance.
pub fn generate_practice_exercises(findings: &[ProblematicSound]) -> Vec<PracticeExercise> {
    let mut seen: Vec<SoundType> = Vec::new();
    for f in findings {
        if !seen.contains(&f.sound_type) {
            seen.push(f.sound_type);
        }
    }
    seen.into_iter().map(exercise_for).collect()
}
