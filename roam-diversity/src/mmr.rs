//! Maximal marginal relevance re-ranking.

use crate::DiversityError;
use crate::ranking::finite_score;

/// Greedily pick `count` items trading relevance against redundancy.
///
/// Each step takes the remaining item maximising
/// `lambda × score − (1 − lambda) × max_similarity`, where the similarity is
/// measured against the items already picked. `lambda == 1.0` is pure
/// relevance ranking; `lambda == 0.0` only avoids redundancy. Ties keep
/// input order. Deterministic: no random source is involved.
///
/// # Errors
/// Returns [`DiversityError::InvalidLambda`] when `lambda` is outside
/// `0.0..=1.0`.
///
/// # Examples
/// ```
/// use roam_diversity::mmr;
///
/// let same_letter = |a: &&str, b: &&str| {
///     if a.chars().next() == b.chars().next() { 1.0 } else { 0.0 }
/// };
/// let items = vec![("a1", 0.9), ("a2", 0.85), ("b1", 0.6)];
/// assert_eq!(mmr(items.clone(), 2, 1.0, same_letter)?, vec!["a1", "a2"]);
/// assert_eq!(mmr(items, 2, 0.5, same_letter)?, vec!["a1", "b1"]);
/// # Ok::<(), roam_diversity::DiversityError>(())
/// ```
pub fn mmr<T, F>(
    items: Vec<(T, f64)>,
    count: usize,
    lambda: f64,
    similarity: F,
) -> Result<Vec<T>, DiversityError>
where
    F: Fn(&T, &T) -> f64,
{
    if !(0.0..=1.0).contains(&lambda) {
        return Err(DiversityError::InvalidLambda { value: lambda });
    }
    let mut remaining: Vec<(T, f64)> = items
        .into_iter()
        .map(|(item, score)| (item, finite_score(score)))
        .collect();
    let mut picked: Vec<T> = Vec::with_capacity(count.min(remaining.len()));
    while picked.len() < count && !remaining.is_empty() {
        let mut best: Option<(usize, f64)> = None;
        for (index, (item, score)) in remaining.iter().enumerate() {
            let redundancy = picked
                .iter()
                .map(|chosen| finite_score(similarity(item, chosen)))
                .fold(0.0_f64, f64::max);
            let value = lambda * score - (1.0 - lambda) * redundancy;
            if best.is_none_or(|(_, current)| value > current) {
                best = Some((index, value));
            }
        }
        let Some((index, _)) = best else {
            break;
        };
        let (item, _) = remaining.remove(index);
        picked.push(item);
    }
    Ok(picked)
}
