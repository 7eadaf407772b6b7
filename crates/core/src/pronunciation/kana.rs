//! Kana classification used by the sound rules.

use std::collections::HashMap;

/// Vowel quality of a kana.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vowel {
    A,
    I,
    U,
    E,
    O,
}

/// Katakana long-vowel mark.
pub const CHOONPU: char = 'ー';

lazy_static::lazy_static! {
    /// Hiragana to vowel. Katakana is folded to hiragana before lookup.
    static ref KANA_VOWELS: HashMap<char, Vowel> = {
        let mut m = HashMap::new();
        for c in "あかさたなはまやらわがざだばぱぁゃゎ".chars() { m.insert(c, Vowel::A); }
        for c in "いきしちにひみりぎじぢびぴぃ".chars() { m.insert(c, Vowel::I); }
        for c in "うくすつぬふむゆるぐずづぶぷぅゅゔ".chars() { m.insert(c, Vowel::U); }
        for c in "えけせてねへめれげぜでべぺぇ".chars() { m.insert(c, Vowel::E); }
        for c in "おこそとのほもよろをごぞどぼぽぉょ".chars() { m.insert(c, Vowel::O); }
        m
    };
}

/// Fold a katakana character to its hiragana counterpart.
pub fn to_hiragana_char(c: char) -> char {
    match c {
        'ァ'..='ヶ' => char::from_u32(c as u32 - 0x60).unwrap_or(c),
        _ => c,
    }
}

/// Fold every katakana character in `text` to hiragana.
pub fn to_hiragana(text: &str) -> String {
    text.chars().map(to_hiragana_char).collect()
}

pub fn vowel_of(c: char) -> Option<Vowel> {
    KANA_VOWELS.get(&to_hiragana_char(c)).copied()
}

/// Vowel a mora ends on, taken from its last kana ("きょ" ends on O).
pub fn mora_vowel(text: &str) -> Option<Vowel> {
    text.chars().last().and_then(vowel_of)
}

/// True if `text` is exactly one of the given hiragana, ignoring script.
pub fn is_one_of(text: &str, set: &[&str]) -> bool {
    let folded = to_hiragana(text.trim());
    set.iter().any(|s| *s == folded)
}

/// Whether `cur` lengthens the vowel of `prev`.
///
/// Recognized pairs: a+あ, i+い, u+う, e+い/え, o+う/お, and any vowel
/// followed by the long-vowel mark.
pub fn is_long_vowel_pair(prev: &str, cur: &str) -> bool {
    let Some(prev_vowel) = mora_vowel(prev) else {
        return false;
    };
    let cur = to_hiragana(cur.trim());
    if cur == CHOONPU.to_string() {
        return true;
    }
    matches!(
        (prev_vowel, cur.as_str()),
        (Vowel::A, "あ")
            | (Vowel::I, "い")
            | (Vowel::U, "う")
            | (Vowel::E, "い")
            | (Vowel::E, "え")
            | (Vowel::O, "う")
            | (Vowel::O, "お")
    )
}
