//! Scoring vocabulary shared by the scorer crates and the orchestrator.
//!
//! The [`Scorer`] trait assigns a sub-score in `0.0..=1.0` to a [`Place`]
//! given a [`UserSnapshot`] and the request's [`ScoringContext`]. The hybrid
//! scorer combines several of them under [`ScoreWeights`] and records the
//! inputs in a [`ScoreBreakdown`].

use chrono::{DateTime, Utc};
use geo::Coord;
use thiserror::Error;

use crate::{ContextInsights, Interest, Place, UserSnapshot};

/// Tolerance applied when checking that weights sum to at most one.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Per-request inputs that are not about the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringContext {
    /// Request origin used for distance-based reasons.
    pub origin: Coord<f64>,
    /// Evaluation time for recency decay and sponsorship windows.
    pub now: DateTime<Utc>,
    /// Situational insights, when the provider answered.
    pub insights: Option<ContextInsights>,
}

impl ScoringContext {
    /// Construct a context without insights.
    #[must_use]
    pub const fn new(origin: Coord<f64>, now: DateTime<Utc>) -> Self {
        Self {
            origin,
            now,
            insights: None,
        }
    }

    /// Attach situational insights.
    #[must_use]
    pub const fn with_insights(mut self, insights: ContextInsights) -> Self {
        self.insights = Some(insights);
        self
    }
}

/// Calculate a sub-score for a place.
///
/// Implementations must be thread-safe (`Send` + `Sync`) so candidates can be
/// scored on a worker pool. The method is infallible: missing data maps to a
/// neutral value chosen by the implementation.
///
/// Implementations must:
/// - Produce finite (`f64::is_finite`) scores.
/// - Normalise results to the range `0.0..=1.0`.
///
/// Use [`Scorer::sanitise`] to apply these guards.
///
/// # Examples
///
/// ```rust
/// use chrono::Utc;
/// use geo::Coord;
/// use roam_core::{Place, Scorer, ScoringContext, UserSnapshot};
///
/// struct Constant;
///
/// impl Scorer for Constant {
///     fn score(&self, _: &UserSnapshot, _: &Place, _: &ScoringContext) -> f64 {
///         Self::sanitise(1.5)
///     }
/// }
///
/// let place = Place::new("p", "Park", "park", Coord { x: 0.0, y: 0.0 });
/// let context = ScoringContext::new(Coord { x: 0.0, y: 0.0 }, Utc::now());
/// assert_eq!(Constant.score(&UserSnapshot::empty("u"), &place, &context), 1.0);
/// ```
pub trait Scorer: Send + Sync {
    /// Return a score for `place` according to `snapshot` and `context`.
    fn score(&self, snapshot: &UserSnapshot, place: &Place, context: &ScoringContext) -> f64;

    /// Clamp and validate a raw score.
    ///
    /// Returns `0.0` for non-finite values and clamps to `0.0..=1.0`.
    fn sanitise(score: f64) -> f64
    where
        Self: Sized,
    {
        sanitise(score)
    }
}

/// Free-function form of [`Scorer::sanitise`].
#[must_use]
pub fn sanitise(score: f64) -> f64 {
    if !score.is_finite() {
        return 0.0;
    }
    score.clamp(0.0, 1.0)
}

/// Errors raised by [`ScoreWeights::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightsError {
    /// A weight was negative or not finite.
    #[error("weight '{name}' must be finite and non-negative, got {value}")]
    InvalidWeight {
        /// Name of the offending weight.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
    /// The weights add up to more than one.
    #[error("weights must sum to at most 1.0, got {sum}")]
    SumExceedsOne {
        /// Observed sum.
        sum: f64,
    },
}

/// Relative contribution of each sub-score to the final score.
///
/// Weights must be finite, non-negative and sum to at most one. A sum below
/// one is accepted: the unused budget simply does not contribute.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ScoreWeights {
    /// Weight of the behavioural (history) score.
    pub implicit: f64,
    /// Weight of the stated-taste score.
    pub explicit: f64,
    /// Weight of the novelty score.
    pub novelty: f64,
    /// Weight of the rating quality score.
    pub quality: f64,
    /// Weight of the situational context score.
    pub context: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            implicit: 0.25,
            explicit: 0.30,
            novelty: 0.20,
            quality: 0.10,
            context: 0.15,
        }
    }
}

impl ScoreWeights {
    fn named(&self) -> [(&'static str, f64); 5] {
        [
            ("implicit", self.implicit),
            ("explicit", self.explicit),
            ("novelty", self.novelty),
            ("quality", self.quality),
            ("context", self.context),
        ]
    }

    /// Sum of all weights.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.named().iter().map(|(_, value)| value).sum()
    }

    /// Check the weights are usable.
    ///
    /// # Examples
    /// ```
    /// use roam_core::{ScoreWeights, WeightsError};
    ///
    /// assert!(ScoreWeights::default().validate().is_ok());
    /// let heavy = ScoreWeights { explicit: 0.9, ..ScoreWeights::default() };
    /// assert!(matches!(heavy.validate(), Err(WeightsError::SumExceedsOne { .. })));
    /// ```
    pub fn validate(&self) -> Result<(), WeightsError> {
        for (name, value) in self.named() {
            if !value.is_finite() || value < 0.0 {
                return Err(WeightsError::InvalidWeight { name, value });
            }
        }
        let sum = self.sum();
        if sum > 1.0 + WEIGHT_SUM_TOLERANCE {
            return Err(WeightsError::SumExceedsOne { sum });
        }
        Ok(())
    }

    /// Move up to `shift` of weight from the taste terms to novelty.
    ///
    /// Half of the shift comes from `explicit` and half from `implicit`, each
    /// bounded by what that weight holds, so the sum is preserved.
    #[must_use]
    pub fn emphasise_novelty(mut self, shift: f64) -> Self {
        if !shift.is_finite() || shift <= 0.0 {
            return self;
        }
        let half = shift / 2.0;
        let from_explicit = half.min(self.explicit);
        let from_implicit = half.min(self.implicit);
        self.explicit -= from_explicit;
        self.implicit -= from_implicit;
        self.novelty += from_explicit + from_implicit;
        self
    }
}

/// Sub-scores and weights behind a final score.
///
/// Kept for explanations; the final score is never re-derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreBreakdown {
    /// Behavioural score.
    pub implicit: f64,
    /// Stated-taste score.
    pub explicit: f64,
    /// Novelty score.
    pub novelty: f64,
    /// Rating quality score.
    pub quality: f64,
    /// Situational context score; `0.0` when no insights were available.
    pub context: f64,
    /// Weights applied to the sub-scores.
    pub weights: ScoreWeights,
    /// Weighted sum, clamped to `0.0..=1.0`.
    pub final_score: f64,
}

/// A stable, machine-readable explanation for a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "String", try_from = "String")
)]
pub enum ReasonCode {
    /// The place matches one of the user's stated interests.
    MatchesInterest(Interest),
    /// The place is unlike recent suggestions and visits.
    NovelExperience,
    /// The place's category was not suggested recently.
    NovelCategory,
    /// The place has a strong, well-supported rating.
    HighlyRated,
    /// The place has a high raw rating.
    HighRating,
    /// The place is within walking reach.
    CloseToYou,
    /// The place resembles places the user engaged with.
    MatchesYourHistory,
    /// The user marked the place as a favourite.
    PreviousFavorite,
    /// The place suits the current time and weather.
    GoodForRightNow,
    /// The place carries a paid placement.
    Sponsored,
    /// Soft fallback: reasonable taste fit.
    FitsYourTaste,
    /// Soft fallback: reasonably novel.
    SomethingDifferent,
    /// Soft fallback: reasonably rated.
    WellReviewed,
}

impl ReasonCode {
    /// Return the stable code string.
    ///
    /// # Examples
    /// ```
    /// use roam_core::{Interest, ReasonCode};
    ///
    /// assert_eq!(
    ///     ReasonCode::MatchesInterest(Interest::Food).as_code(),
    ///     "MATCHES_INTEREST_FOOD"
    /// );
    /// assert_eq!(ReasonCode::CloseToYou.as_code(), "CLOSE_TO_YOU");
    /// ```
    #[must_use]
    pub fn as_code(self) -> String {
        match self {
            Self::MatchesInterest(interest) => format!("MATCHES_INTEREST_{}", interest.as_code()),
            Self::NovelExperience => "NOVEL_EXPERIENCE".to_owned(),
            Self::NovelCategory => "NOVEL_CATEGORY".to_owned(),
            Self::HighlyRated => "HIGHLY_RATED".to_owned(),
            Self::HighRating => "HIGH_RATING".to_owned(),
            Self::CloseToYou => "CLOSE_TO_YOU".to_owned(),
            Self::MatchesYourHistory => "MATCHES_YOUR_HISTORY".to_owned(),
            Self::PreviousFavorite => "PREVIOUS_FAVORITE".to_owned(),
            Self::GoodForRightNow => "GOOD_FOR_RIGHT_NOW".to_owned(),
            Self::Sponsored => "SPONSORED".to_owned(),
            Self::FitsYourTaste => "FITS_YOUR_TASTE".to_owned(),
            Self::SomethingDifferent => "SOMETHING_DIFFERENT".to_owned(),
            Self::WellReviewed => "WELL_REVIEWED".to_owned(),
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_code())
    }
}

impl From<ReasonCode> for String {
    fn from(code: ReasonCode) -> Self {
        code.as_code()
    }
}

impl std::str::FromStr for ReasonCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(interest) = s.strip_prefix("MATCHES_INTEREST_") {
            return interest
                .parse::<Interest>()
                .map(Self::MatchesInterest)
                .map_err(|_| format!("unknown reason code '{s}'"));
        }
        match s {
            "NOVEL_EXPERIENCE" => Ok(Self::NovelExperience),
            "NOVEL_CATEGORY" => Ok(Self::NovelCategory),
            "HIGHLY_RATED" => Ok(Self::HighlyRated),
            "HIGH_RATING" => Ok(Self::HighRating),
            "CLOSE_TO_YOU" => Ok(Self::CloseToYou),
            "MATCHES_YOUR_HISTORY" => Ok(Self::MatchesYourHistory),
            "PREVIOUS_FAVORITE" => Ok(Self::PreviousFavorite),
            "GOOD_FOR_RIGHT_NOW" => Ok(Self::GoodForRightNow),
            "SPONSORED" => Ok(Self::Sponsored),
            "FITS_YOUR_TASTE" => Ok(Self::FitsYourTaste),
            "SOMETHING_DIFFERENT" => Ok(Self::SomethingDifferent),
            "WELL_REVIEWED" => Ok(Self::WellReviewed),
            _ => Err(format!("unknown reason code '{s}'")),
        }
    }
}

impl TryFrom<String> for ReasonCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A place with its score breakdown and explanations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoredCandidate {
    /// The scored place.
    pub place: Place,
    /// Sub-scores and the final score.
    pub breakdown: ScoreBreakdown,
    /// Reasons ordered by the magnitude of their contributing signal.
    pub reasons: Vec<ReasonCode>,
    /// Haversine distance from the request origin in metres.
    pub distance_m: f64,
}

impl ScoredCandidate {
    /// Shorthand for the final score.
    #[must_use]
    pub const fn score(&self) -> f64 {
        self.breakdown.final_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(f64::NAN, 0.0)]
    #[case(f64::INFINITY, 0.0)]
    #[case(f64::NEG_INFINITY, 0.0)]
    #[case(-0.1, 0.0)]
    #[case(1.2, 1.0)]
    #[case(0.4, 0.4)]
    fn sanitise_clamps_and_filters(#[case] input: f64, #[case] expected: f64) {
        assert_eq!(sanitise(input), expected);
    }

    #[rstest]
    fn default_weights_sum_to_one() {
        let weights = ScoreWeights::default();
        assert!((weights.sum() - 1.0).abs() < WEIGHT_SUM_TOLERANCE);
        assert!(weights.validate().is_ok());
    }

    #[rstest]
    fn partial_weights_are_accepted() {
        let weights = ScoreWeights {
            context: 0.0,
            ..ScoreWeights::default()
        };
        assert!(weights.validate().is_ok());
    }

    #[rstest]
    #[case(ScoreWeights { novelty: -0.1, ..ScoreWeights::default() }, "novelty")]
    #[case(ScoreWeights { quality: f64::NAN, ..ScoreWeights::default() }, "quality")]
    fn invalid_weights_are_named(#[case] weights: ScoreWeights, #[case] expected: &str) {
        match weights.validate() {
            Err(WeightsError::InvalidWeight { name, .. }) => assert_eq!(name, expected),
            other => panic!("expected invalid weight, got {other:?}"),
        }
    }

    #[rstest]
    #[case(0.15)]
    #[case(2.0)]
    fn novelty_emphasis_preserves_sum(#[case] shift: f64) {
        let base = ScoreWeights::default();
        let emphasised = base.emphasise_novelty(shift);
        assert!((emphasised.sum() - base.sum()).abs() < 1e-12);
        assert!(emphasised.novelty > base.novelty);
        assert!(emphasised.explicit >= 0.0 && emphasised.implicit >= 0.0);
    }

    #[rstest]
    #[case(ReasonCode::MatchesInterest(Interest::Nature))]
    #[case(ReasonCode::GoodForRightNow)]
    #[case(ReasonCode::WellReviewed)]
    fn reason_codes_parse_back(#[case] code: ReasonCode) {
        assert_eq!(code.as_code().parse::<ReasonCode>(), Ok(code));
    }

    #[rstest]
    fn unknown_reason_code_is_rejected() {
        assert!("MATCHES_INTEREST_ASTROLOGY".parse::<ReasonCode>().is_err());
        assert!("BECAUSE".parse::<ReasonCode>().is_err());
    }
}
