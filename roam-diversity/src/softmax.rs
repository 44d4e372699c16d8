//! Boltzmann (softmax) sampling without replacement.

use rand::Rng;

use crate::DiversityError;
use crate::ranking::rank_by_score;

/// Sample `count` distinct items with probability proportional to
/// `exp(score / temperature)`.
///
/// Exponents are shifted by the best remaining score before
/// exponentiation, so the best item always weighs `1.0`. Low temperatures
/// approach greedy top-K; high temperatures approach uniform sampling.
///
/// # Errors
/// Returns [`DiversityError::InvalidTemperature`] when `temperature` is not
/// finite or not positive.
pub fn softmax<T, R>(
    items: Vec<(T, f64)>,
    count: usize,
    temperature: f64,
    rng: &mut R,
) -> Result<Vec<T>, DiversityError>
where
    R: Rng + ?Sized,
{
    if !temperature.is_finite() || temperature <= 0.0 {
        return Err(DiversityError::InvalidTemperature { value: temperature });
    }
    let mut remaining = rank_by_score(items);
    let mut picked = Vec::with_capacity(count.min(remaining.len()));
    while picked.len() < count && !remaining.is_empty() {
        let index = sample_index(&remaining, temperature, rng);
        let (item, _) = remaining.remove(index);
        picked.push(item);
    }
    Ok(picked)
}

fn sample_index<T, R>(remaining: &[(T, f64)], temperature: f64, rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    let best = remaining
        .iter()
        .map(|(_, score)| *score)
        .fold(f64::NEG_INFINITY, f64::max);
    let weights: Vec<f64> = remaining
        .iter()
        .map(|(_, score)| ((score - best) / temperature).exp())
        .collect();
    let total: f64 = weights.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return 0;
    }
    let mut threshold = rng.gen_range(0.0..total);
    for (index, weight) in weights.iter().enumerate() {
        if threshold < *weight {
            return index;
        }
        threshold -= weight;
    }
    weights.len().saturating_sub(1)
}
