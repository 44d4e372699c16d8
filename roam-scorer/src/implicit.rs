//! Behavioural scoring from the user's learned-preference log.

use std::f64::consts::LN_2;

use chrono::{DateTime, Utc};
use roam_core::{
    FeedbackEvent, FeedbackKind, NEUTRAL_WEIGHT, Place, Scorer, ScoringContext, UserSnapshot,
    category::normalise_category, sanitise,
};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Tunables for [`ImplicitScorer`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ImplicitConfig {
    /// Number of newest positive events considered for affinity.
    pub visit_window: usize,
    /// Penalty applied by a fresh dislike of the same category.
    pub avoidance_penalty: f64,
    /// Days after which a dislike's penalty halves.
    pub avoidance_half_life_days: f64,
    /// Bonus for places the user marked as favourite.
    pub favorite_boost: f64,
}

impl Default for ImplicitConfig {
    fn default() -> Self {
        Self {
            visit_window: 50,
            avoidance_penalty: 0.4,
            avoidance_half_life_days: 30.0,
            favorite_boost: 0.15,
        }
    }
}

/// Scores a place by how the user behaved around similar places.
///
/// Users with no feedback who have not favourited the place score exactly
/// [`NEUTRAL_WEIGHT`]. Positive history lifts or lowers the base between
/// `0.25` and `0.75` by affinity; dislikes of the category subtract a
/// decaying penalty and favourites add a fixed boost.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImplicitScorer {
    config: ImplicitConfig,
}

impl ImplicitScorer {
    /// Build a scorer with explicit tunables.
    #[must_use]
    pub const fn new(config: ImplicitConfig) -> Self {
        Self { config }
    }

    /// Active tunables.
    #[must_use]
    pub const fn config(&self) -> &ImplicitConfig {
        &self.config
    }

    /// Score `place` for the user behind `snapshot` at `now`.
    #[must_use]
    pub fn score_at(&self, snapshot: &UserSnapshot, place: &Place, now: DateTime<Utc>) -> f64 {
        let favourite = snapshot.is_favorite(&place.id);
        if snapshot.feedback.is_empty() && !favourite {
            return NEUTRAL_WEIGHT;
        }
        let target = PlaceKey::new(place);

        let positives: Vec<&FeedbackEvent> = snapshot
            .feedback
            .iter()
            .filter(|event| event.kind.is_positive())
            .take(self.config.visit_window)
            .collect();
        let base = if positives.is_empty() {
            NEUTRAL_WEIGHT
        } else {
            let matching = positives
                .iter()
                .filter(|event| target.matches(event))
                .count();
            0.25 + 0.5 * ratio(matching, positives.len())
        };

        let penalty = snapshot
            .feedback
            .iter()
            .filter(|event| event.kind == FeedbackKind::Disliked)
            .filter(|event| target.same_category(event))
            .map(|event| self.decayed_penalty(now, event.occurred_at))
            .fold(0.0_f64, f64::max);

        let boost = if favourite {
            self.config.favorite_boost
        } else {
            0.0
        };
        sanitise(base - penalty + boost)
    }

    fn decayed_penalty(&self, now: DateTime<Utc>, occurred_at: DateTime<Utc>) -> f64 {
        let age_days = age_in_days(now, occurred_at);
        let half_life = self.config.avoidance_half_life_days;
        if half_life <= 0.0 {
            return 0.0;
        }
        self.config.avoidance_penalty * (-age_days / half_life * LN_2).exp()
    }
}

impl Scorer for ImplicitScorer {
    fn score(&self, snapshot: &UserSnapshot, place: &Place, context: &ScoringContext) -> f64 {
        self.score_at(snapshot, place, context.now)
    }
}

/// Normalised identity of the scored place used for matching events.
struct PlaceKey {
    category: String,
    cuisine: Option<String>,
}

impl PlaceKey {
    fn new(place: &Place) -> Self {
        Self {
            category: normalise_category(&place.category),
            cuisine: place
                .cuisine
                .as_deref()
                .map(normalise_category)
                .filter(|cuisine| !cuisine.is_empty()),
        }
    }

    fn same_category(&self, event: &FeedbackEvent) -> bool {
        !self.category.is_empty() && normalise_category(&event.category) == self.category
    }

    fn matches(&self, event: &FeedbackEvent) -> bool {
        if self.same_category(event) {
            return true;
        }
        match (&self.cuisine, event.cuisine.as_deref()) {
            (Some(ours), Some(theirs)) => *ours == normalise_category(theirs),
            _ => false,
        }
    }
}

/// Elapsed days between `then` and `now`, never negative.
pub(crate) fn age_in_days(now: DateTime<Utc>, then: DateTime<Utc>) -> f64 {
    let seconds = (now - then).num_milliseconds().max(0);
    #[expect(
        clippy::cast_precision_loss,
        reason = "millisecond ages stay far below 2^52"
    )]
    let seconds = seconds as f64 / 1_000.0;
    seconds / SECONDS_PER_DAY
}

#[expect(
    clippy::cast_precision_loss,
    reason = "history windows hold at most a few hundred entries"
)]
pub(crate) fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64
}
