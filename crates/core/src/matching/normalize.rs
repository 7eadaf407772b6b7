/// Canonical form used by every comparison: trimmed, internal whitespace
/// collapsed to single spaces, lowercased.
///
/// Lowercasing only affects romaji; kana and kanji pass through unchanged.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Number of characters (not bytes) in the normalized form.
pub fn normalized_len(text: &str) -> usize {
    normalize(text).chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_collapses() {
        assert_eq!(normalize("  Sumimasen   kudasai \t"), "sumimasen kudasai");
    }

    #[test]
    fn test_normalize_japanese_untouched() {
        assert_eq!(normalize("メニューを見せてください"), "メニューを見せてください");
    }

    #[test]
    fn test_normalize_ideographic_space() {
        // U+3000 counts as whitespace
        assert_eq!(normalize("お水\u{3000}ください"), "お水 ください");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_normalized_len_counts_chars() {
        assert_eq!(normalized_len(" ラーメン "), 4);
    }
}
