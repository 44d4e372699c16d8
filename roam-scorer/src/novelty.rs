//! Novelty scoring: how unlike recent activity a place is.

use chrono::{DateTime, Utc};
use roam_core::{
    FeedbackKind, Place, Scorer, ScoringContext, UserSnapshot, category::normalise_category,
    sanitise,
};

use crate::implicit::{age_in_days, ratio};

/// Tunables for [`NoveltyScorer`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct NoveltyConfig {
    /// Number of newest suggestions and visits inspected for category repeats.
    pub window: usize,
    /// Days over which a revisited place regains novelty.
    pub saturation_days: f64,
}

impl Default for NoveltyConfig {
    fn default() -> Self {
        Self {
            window: 10,
            saturation_days: 14.0,
        }
    }
}

/// Scores places higher the less they repeat recent activity.
///
/// The score averages two signals, both monotonic:
/// - category novelty, `1 - matches / window` over the newest `window`
///   suggestions and visits combined;
/// - revisit novelty, `1` for a place never seen before, otherwise
///   `1 - exp(-elapsed_days / saturation_days)` since it was last seen.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoveltyScorer {
    config: NoveltyConfig,
}

impl NoveltyScorer {
    /// Build a scorer with explicit tunables.
    #[must_use]
    pub const fn new(config: NoveltyConfig) -> Self {
        Self { config }
    }

    /// Score `place` for the user behind `snapshot` at `now`.
    #[must_use]
    pub fn score_at(&self, snapshot: &UserSnapshot, place: &Place, now: DateTime<Utc>) -> f64 {
        let category = self.category_novelty(snapshot, place);
        let revisit = self.revisit_novelty(snapshot, place, now);
        sanitise((category + revisit) / 2.0)
    }

    fn category_novelty(&self, snapshot: &UserSnapshot, place: &Place) -> f64 {
        let window = self.config.window;
        let target = normalise_category(&place.category);
        if window == 0 || target.is_empty() {
            return 1.0;
        }
        let mut recent: Vec<(DateTime<Utc>, &str)> = snapshot
            .suggestion_history
            .iter()
            .map(|entry| (entry.suggested_at, entry.category.as_str()))
            .chain(
                snapshot
                    .feedback
                    .iter()
                    .filter(|event| event.kind == FeedbackKind::Visited)
                    .map(|event| (event.occurred_at, event.category.as_str())),
            )
            .collect();
        recent.sort_by(|a, b| b.0.cmp(&a.0));
        let matches = recent
            .iter()
            .take(window)
            .filter(|(_, category)| normalise_category(category) == target)
            .count();
        1.0 - ratio(matches, window)
    }

    fn revisit_novelty(&self, snapshot: &UserSnapshot, place: &Place, now: DateTime<Utc>) -> f64 {
        let suggested = snapshot
            .suggestion_history
            .iter()
            .filter(|entry| entry.place_id == place.id)
            .map(|entry| entry.suggested_at);
        let visited = snapshot
            .feedback
            .iter()
            .filter(|event| event.kind == FeedbackKind::Visited && event.place_id == place.id)
            .map(|event| event.occurred_at);
        let Some(last_seen) = suggested.chain(visited).max() else {
            return 1.0;
        };
        let saturation = self.config.saturation_days;
        if saturation <= 0.0 {
            return 1.0;
        }
        1.0 - (-age_in_days(now, last_seen) / saturation).exp()
    }
}

impl Scorer for NoveltyScorer {
    fn score(&self, snapshot: &UserSnapshot, place: &Place, context: &ScoringContext) -> f64 {
        self.score_at(snapshot, place, context.now)
    }
}
