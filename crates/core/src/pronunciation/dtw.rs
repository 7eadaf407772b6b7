//! Dynamic time warping over mora-duration sequences.

/// Min-max scale to [0, 1]. A flat sequence maps to 0.5 everywhere.
pub fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range <= 0.0 {
        return vec![0.5; values.len()];
    }
    values.iter().map(|v| (v - min) / range).collect()
}

/// Minimum cumulative absolute difference over all monotonic alignments.
///
/// Standard three-neighbour recurrence (insertion, deletion, match).
/// Returns infinity if either sequence is empty.
pub fn dtw_distance(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len();
    let m = b.len();
    if n == 0 || m == 0 {
        return f64::INFINITY;
    }

    let mut dp = vec![vec![f64::INFINITY; m + 1]; n + 1];
    dp[0][0] = 0.0;
    for i in 1..=n {
        for j in 1..=m {
            let cost = (a[i - 1] - b[j - 1]).abs();
            let prev = dp[i - 1][j].min(dp[i][j - 1]).min(dp[i - 1][j - 1]);
            dp[i][j] = cost + prev;
        }
    }
    dp[n][m]
}

/// Timing-shape similarity in [0, 100] between two duration sequences.
///
/// Both sequences are min-max scaled first, so only relative timing
/// matters. Empty input scores 0.
pub fn rhythm_similarity(user: &[f64], native: &[f64]) -> f64 {
    if user.is_empty() || native.is_empty() {
        return 0.0;
    }
    let cost = dtw_distance(&min_max_normalize(user), &min_max_normalize(native));
    let max_len = user.len().max(native.len()) as f64;
    (100.0 - cost / max_len * 100.0).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_range() {
        let n = min_max_normalize(&[100.0, 150.0, 200.0]);
        assert_eq!(n, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_normalize_flat() {
        assert_eq!(min_max_normalize(&[120.0, 120.0]), vec![0.5, 0.5]);
        assert!(min_max_normalize(&[]).is_empty());
    }

    #[test]
    fn test_dtw_identical_is_zero() {
        let a = [0.1, 0.5, 0.9];
        assert_eq!(dtw_distance(&a, &a), 0.0);
    }

    #[test]
    fn test_dtw_absorbs_stretching() {
        // Repeating an element costs nothing once aligned
        let a = [0.0, 1.0, 0.0];
        let b = [0.0, 1.0, 1.0, 0.0];
        assert_eq!(dtw_distance(&a, &b), 0.0);
    }

    #[test]
    fn test_dtw_known_cost() {
        let a = [0.0, 0.0];
        let b = [1.0, 1.0];
        assert!((dtw_distance(&a, &b) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_dtw_symmetric() {
        let a = [0.2, 0.7, 0.1, 0.4];
        let b = [0.3, 0.3, 0.9];
        assert!((dtw_distance(&a, &b) - dtw_distance(&b, &a)).abs() < 1e-12);
    }

    #[test]
    fn test_dtw_empty() {
        assert!(dtw_distance(&[], &[1.0]).is_infinite());
    }

    #[test]
    fn test_rhythm_similarity_scale_invariant() {
        let user = [100.0, 200.0, 100.0, 200.0];
        let native = [50.0, 100.0, 50.0, 100.0];
        assert!((rhythm_similarity(&user, &native) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_rhythm_similarity_opposite_patterns() {
        let user = [100.0, 200.0];
        let native = [200.0, 100.0];
        let s = rhythm_similarity(&user, &native);
        assert!((0.0..100.0).contains(&s));
    }

    #[test]
    fn test_rhythm_similarity_empty() {
        assert_eq!(rhythm_similarity(&[], &[120.0]), 0.0);
    }
}
