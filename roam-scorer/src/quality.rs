//! Bayesian-smoothed rating quality.

use roam_core::{Place, Scorer, ScoringContext, UserSnapshot, sanitise};

/// Highest rating on the catalogue scale.
pub const MAX_RATING: f64 = 5.0;

/// Tunables for [`QualityScorer`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct QualityConfig {
    /// Review count at which the rating and the prior weigh equally.
    pub smoothing: f64,
    /// Quality assumed for places without reviews.
    pub prior: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            smoothing: 50.0,
            prior: 0.5,
        }
    }
}

/// Scores places by rating, shrunk towards a prior when reviews are few.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use roam_core::Place;
/// use roam_scorer::QualityScorer;
///
/// let origin = Coord { x: 0.0, y: 0.0 };
/// let unrated = Place::new("a", "A", "park", origin);
/// let famous = Place::new("b", "B", "park", origin).with_rating(4.8, 5_000);
///
/// assert_eq!(QualityScorer::default().score_place(&unrated), 0.5);
/// assert!(QualityScorer::default().score_place(&famous) > 0.9);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct QualityScorer {
    config: QualityConfig,
}

impl QualityScorer {
    /// Build a scorer with explicit tunables.
    #[must_use]
    pub const fn new(config: QualityConfig) -> Self {
        Self { config }
    }

    /// Score a place from its rating and review count alone.
    #[must_use]
    pub fn score_place(&self, place: &Place) -> f64 {
        let prior = sanitise(self.config.prior);
        let Some(rating) = place.rating.filter(|rating| rating.is_finite()) else {
            return prior;
        };
        let reviews = f64::from(place.review_count);
        let denominator = reviews + self.config.smoothing.max(0.0);
        let confidence = if denominator > 0.0 {
            reviews / denominator
        } else {
            0.0
        };
        let normalised = (rating / MAX_RATING).clamp(0.0, 1.0);
        sanitise(confidence * normalised + (1.0 - confidence) * prior)
    }
}

impl Scorer for QualityScorer {
    fn score(&self, _snapshot: &UserSnapshot, place: &Place, _context: &ScoringContext) -> f64 {
        self.score_place(place)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::rstest;

    fn rated(rating: f64, reviews: u32) -> Place {
        Place::new("p", "p", "cafe", Coord { x: 0.0, y: 0.0 }).with_rating(rating, reviews)
    }

    #[rstest]
    #[case(5.0, 0, 0.5)]
    #[case(5.0, 50, 0.75)]
    #[case(0.0, 50, 0.25)]
    #[case(9.0, 50, 0.75)]
    fn smoothing_blends_rating_and_prior(
        #[case] rating: f64,
        #[case] reviews: u32,
        #[case] expected: f64,
    ) {
        let score = QualityScorer::default().score_place(&rated(rating, reviews));
        assert!((score - expected).abs() < 1e-12, "{score}");
    }

    #[rstest]
    fn more_reviews_mean_more_trust() {
        let scorer = QualityScorer::default();
        let few = scorer.score_place(&rated(4.5, 3));
        let many = scorer.score_place(&rated(4.5, 3_000));
        assert!(many > few);
    }

    #[rstest]
    fn zero_smoothing_trusts_the_rating() {
        let scorer = QualityScorer::new(QualityConfig {
            smoothing: 0.0,
            prior: 0.5,
        });
        assert_eq!(scorer.score_place(&rated(4.0, 0)), 0.5);
        assert!((scorer.score_place(&rated(4.0, 1)) - 0.8).abs() < 1e-12);
    }
}
