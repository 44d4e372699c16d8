//! Thompson sampling over Beta-distributed arms.

use rand::Rng;
use rand_distr::{Beta, Distribution};

use crate::DiversityError;
use crate::ranking::finite_score;

/// An item with the evidence gathered for it so far.
#[derive(Debug, Clone, PartialEq)]
pub struct Arm<T> {
    /// The candidate behind the arm.
    pub item: T,
    /// Observed (or pseudo-) successes.
    pub successes: f64,
    /// Observed (or pseudo-) failures.
    pub failures: f64,
}

impl<T> Arm<T> {
    /// Build an arm from raw counts.
    #[must_use]
    pub const fn new(item: T, successes: f64, failures: f64) -> Self {
        Self {
            item,
            successes,
            failures,
        }
    }

    /// Build an arm whose prior is centred on `score`.
    ///
    /// The score contributes `prior_strength` pseudo-observations split as
    /// `score` successes and `1 - score` failures; real feedback counts are
    /// added on top.
    ///
    /// # Examples
    /// ```
    /// use roam_diversity::Arm;
    ///
    /// let arm = Arm::from_score("p", 0.8, 10.0, 2, 1);
    /// assert!((arm.successes - 10.0).abs() < 1e-9);
    /// assert!((arm.failures - 3.0).abs() < 1e-9);
    /// ```
    #[must_use]
    pub fn from_score(
        item: T,
        score: f64,
        prior_strength: f64,
        positives: u32,
        negatives: u32,
    ) -> Self {
        let score = finite_score(score).clamp(0.0, 1.0);
        let strength = finite_score(prior_strength).max(0.0);
        Self {
            item,
            successes: score * strength + f64::from(positives),
            failures: (1.0 - score) * strength + f64::from(negatives),
        }
    }
}

/// Pick `count` arms without replacement.
///
/// Each pick draws a fresh sample from `Beta(successes + 1, failures + 1)`
/// for every arm still in play and takes the highest draw. Ties go to the
/// earlier arm.
///
/// # Errors
/// Returns [`DiversityError::InvalidBetaParameters`] when an arm's evidence
/// is negative or not finite.
pub fn thompson<T, R>(arms: Vec<Arm<T>>, count: usize, rng: &mut R) -> Result<Vec<T>, DiversityError>
where
    R: Rng + ?Sized,
{
    let mut remaining = arms
        .into_iter()
        .map(|arm| posterior(&arm).map(|distribution| (arm.item, distribution)))
        .collect::<Result<Vec<_>, _>>()?;
    let mut picked = Vec::with_capacity(count.min(remaining.len()));
    while picked.len() < count && !remaining.is_empty() {
        let mut best: Option<(usize, f64)> = None;
        for (index, (_, distribution)) in remaining.iter().enumerate() {
            let draw = distribution.sample(rng);
            if best.is_none_or(|(_, top)| draw > top) {
                best = Some((index, draw));
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

fn posterior<T>(arm: &Arm<T>) -> Result<Beta<f64>, DiversityError> {
    let alpha = arm.successes + 1.0;
    let beta = arm.failures + 1.0;
    let invalid = || DiversityError::InvalidBetaParameters { alpha, beta };
    if !alpha.is_finite() || !beta.is_finite() || alpha < 1.0 || beta < 1.0 {
        return Err(invalid());
    }
    Beta::new(alpha, beta).map_err(|_| invalid())
}
