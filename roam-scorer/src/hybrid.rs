//! Weighted blend of the individual scorers with explanations.

use std::cmp::Ordering;
use std::sync::Arc;

use rayon::ThreadPool;
use rayon::prelude::*;
use roam_core::{
    Place, ScoreBreakdown, ScoreWeights, ScoredCandidate, Scorer, ScoringContext, UserSnapshot,
    WeightsError, haversine_m, sanitise,
};

use crate::{
    ContextScorer, ExplicitScorer, ImplicitConfig, ImplicitScorer, NoveltyConfig, NoveltyScorer,
    QualityConfig, QualityScorer, ReasonConfig, ReasonSignals,
};

/// Combines implicit, explicit, novelty, quality and context scores.
///
/// The final score is `Σ weight × sub-score`, clamped to `0.0..=1.0`.
/// Candidates are scored on the configured worker pool, or on the calling
/// thread when no pool is attached.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use geo::Coord;
/// use roam_core::{Place, ScoreWeights, ScoringContext, UserSnapshot};
/// use roam_scorer::HybridScorer;
///
/// let origin = Coord { x: -0.1276, y: 51.5072 };
/// let scorer = HybridScorer::new(ScoreWeights::default())?;
/// let candidates = vec![
///     Place::new("b", "Gallery", "gallery", origin),
///     Place::new("a", "Park", "park", origin).with_rating(4.9, 900),
/// ];
/// let ranked = scorer.score_and_explain(
///     &UserSnapshot::empty("u1"),
///     candidates,
///     &ScoringContext::new(origin, Utc::now()),
/// );
/// assert_eq!(ranked.first().map(|c| c.place.id.as_str()), Some("a"));
/// # Ok::<(), roam_core::WeightsError>(())
/// ```
#[derive(Debug, Clone)]
pub struct HybridScorer {
    weights: ScoreWeights,
    implicit: ImplicitScorer,
    explicit: ExplicitScorer,
    novelty: NoveltyScorer,
    quality: QualityScorer,
    context: ContextScorer,
    reasons: ReasonConfig,
    pool: Option<Arc<ThreadPool>>,
}

impl HybridScorer {
    /// Build a scorer with default sub-scorer tunables.
    ///
    /// # Errors
    /// Returns [`WeightsError`] when the weights fail validation.
    pub fn new(weights: ScoreWeights) -> Result<Self, WeightsError> {
        weights.validate()?;
        Ok(Self {
            weights,
            implicit: ImplicitScorer::default(),
            explicit: ExplicitScorer,
            novelty: NoveltyScorer::default(),
            quality: QualityScorer::default(),
            context: ContextScorer,
            reasons: ReasonConfig::default(),
            pool: None,
        })
    }

    /// Replace the implicit scorer's tunables.
    #[must_use]
    pub fn with_implicit(mut self, config: ImplicitConfig) -> Self {
        self.implicit = ImplicitScorer::new(config);
        self
    }

    /// Replace the novelty scorer's tunables.
    #[must_use]
    pub fn with_novelty(mut self, config: NoveltyConfig) -> Self {
        self.novelty = NoveltyScorer::new(config);
        self
    }

    /// Replace the quality scorer's tunables.
    #[must_use]
    pub fn with_quality(mut self, config: QualityConfig) -> Self {
        self.quality = QualityScorer::new(config);
        self
    }

    /// Replace the reason thresholds.
    #[must_use]
    pub fn with_reasons(mut self, config: ReasonConfig) -> Self {
        self.reasons = config;
        self
    }

    /// Score candidates on `pool` instead of the calling thread.
    #[must_use]
    pub fn with_pool(mut self, pool: Arc<ThreadPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Weights applied to the sub-scores.
    #[must_use]
    pub const fn weights(&self) -> ScoreWeights {
        self.weights
    }

    /// Clone the scorer with different weights, sharing the worker pool.
    ///
    /// # Errors
    /// Returns [`WeightsError`] when the weights fail validation.
    pub fn reweighted(&self, weights: ScoreWeights) -> Result<Self, WeightsError> {
        weights.validate()?;
        Ok(Self {
            weights,
            ..self.clone()
        })
    }

    /// Compute every sub-score and the weighted final score for `place`.
    #[must_use]
    pub fn breakdown(
        &self,
        snapshot: &UserSnapshot,
        place: &Place,
        context: &ScoringContext,
    ) -> ScoreBreakdown {
        let implicit = self.implicit.score(snapshot, place, context);
        let explicit = self.explicit.score(snapshot, place, context);
        let novelty = self.novelty.score(snapshot, place, context);
        let quality = self.quality.score(snapshot, place, context);
        let context_fit = self.context.score(snapshot, place, context);
        let weights = self.weights;
        let final_score = sanitise(
            weights.implicit * implicit
                + weights.explicit * explicit
                + weights.novelty * novelty
                + weights.quality * quality
                + weights.context * context_fit,
        );
        ScoreBreakdown {
            implicit,
            explicit,
            novelty,
            quality,
            context: context_fit,
            weights,
            final_score,
        }
    }

    /// Score, explain and rank `candidates`.
    ///
    /// The result is ordered by final score descending, then quality
    /// descending, then place id ascending. A candidate whose reasons cannot
    /// be derived keeps its score with an empty reason list.
    #[must_use]
    pub fn score_and_explain(
        &self,
        snapshot: &UserSnapshot,
        candidates: Vec<Place>,
        context: &ScoringContext,
    ) -> Vec<ScoredCandidate> {
        let mut scored = self.evaluate_all(snapshot, candidates, context);
        scored.sort_by(rank);
        log::debug!("scored {} candidates for user {}", scored.len(), snapshot.user_id);
        scored
    }

    fn evaluate_all(
        &self,
        snapshot: &UserSnapshot,
        candidates: Vec<Place>,
        context: &ScoringContext,
    ) -> Vec<ScoredCandidate> {
        let Some(pool) = &self.pool else {
            return candidates
                .into_iter()
                .map(|place| self.evaluate(snapshot, place, context))
                .collect();
        };
        pool.install(|| {
            candidates
                .into_par_iter()
                .map(|place| self.evaluate(snapshot, place, context))
                .collect()
        })
    }

    fn evaluate(
        &self,
        snapshot: &UserSnapshot,
        place: Place,
        context: &ScoringContext,
    ) -> ScoredCandidate {
        let breakdown = self.breakdown(snapshot, &place, context);
        let distance_m = haversine_m(context.origin, place.location);
        let signals = ReasonSignals {
            top_interest: self.explicit.top_interest(snapshot.profile.as_ref(), &place),
            distance_m,
            favorite: snapshot.is_favorite(&place.id),
            sponsored: place.is_sponsored_at(context.now),
        };
        let reasons = self
            .reasons
            .explain(&breakdown, &signals)
            .unwrap_or_else(|error| {
                log::warn!("dropping reasons for place {}: {error}", place.id);
                Vec::new()
            });
        ScoredCandidate {
            place,
            breakdown,
            reasons,
            distance_m,
        }
    }
}

impl Scorer for HybridScorer {
    fn score(&self, snapshot: &UserSnapshot, place: &Place, context: &ScoringContext) -> f64 {
        self.breakdown(snapshot, place, context).final_score
    }
}

fn rank(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.score()
        .total_cmp(&a.score())
        .then_with(|| b.breakdown.quality.total_cmp(&a.breakdown.quality))
        .then_with(|| a.place.id.cmp(&b.place.id))
}
