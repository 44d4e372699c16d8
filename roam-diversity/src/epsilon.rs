//! Epsilon-greedy selection.

use rand::Rng;

use crate::DiversityError;
use crate::ranking::rank_by_score;

/// Pick `count` items, exploring a random one with probability `epsilon`.
///
/// Each slot takes the best remaining item, except with probability
/// `epsilon` when it takes a uniformly random remaining item instead. With
/// `epsilon == 0.0` the result is exactly the top `count` items in score
/// order, ties kept in input order.
///
/// # Errors
/// Returns [`DiversityError::InvalidEpsilon`] when `epsilon` is outside
/// `0.0..=1.0`.
///
/// # Examples
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use roam_diversity::epsilon_greedy;
///
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let items = vec![("a", 0.2), ("b", 0.9), ("c", 0.5)];
/// let picked = epsilon_greedy(items, 2, 0.0, &mut rng)?;
/// assert_eq!(picked, vec!["b", "c"]);
/// # Ok::<(), roam_diversity::DiversityError>(())
/// ```
pub fn epsilon_greedy<T, R>(
    items: Vec<(T, f64)>,
    count: usize,
    epsilon: f64,
    rng: &mut R,
) -> Result<Vec<T>, DiversityError>
where
    R: Rng + ?Sized,
{
    if !(0.0..=1.0).contains(&epsilon) {
        return Err(DiversityError::InvalidEpsilon { value: epsilon });
    }
    let mut remaining = rank_by_score(items);
    let mut picked = Vec::with_capacity(count.min(remaining.len()));
    while picked.len() < count && !remaining.is_empty() {
        let index = if epsilon > 0.0 && rng.gen_bool(epsilon) {
            rng.gen_range(0..remaining.len())
        } else {
            0
        };
        let (item, _) = remaining.remove(index);
        picked.push(item);
    }
    Ok(picked)
}
