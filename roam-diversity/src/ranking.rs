//! Shared ordering helpers.

/// Replace non-finite scores with zero.
pub(crate) fn finite_score(score: f64) -> f64 {
    if score.is_finite() { score } else { 0.0 }
}

/// Sort by score descending, keeping input order among equal scores.
pub(crate) fn rank_by_score<T>(items: Vec<(T, f64)>) -> Vec<(T, f64)> {
    let mut ranked: Vec<(T, f64)> = items
        .into_iter()
        .map(|(item, score)| (item, finite_score(score)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}
