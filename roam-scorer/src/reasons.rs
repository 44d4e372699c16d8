//! Reason codes explaining why a candidate was suggested.

use roam_core::{Interest, ReasonCode, ScoreBreakdown};

use crate::ReasonError;

/// Thresholds controlling which reasons a candidate earns.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ReasonConfig {
    /// Minimum taste, history, novelty or context sub-score for a reason.
    pub signal_threshold: f64,
    /// Minimum quality sub-score for [`ReasonCode::HighlyRated`].
    pub quality_threshold: f64,
    /// Distance in metres under which a place counts as close.
    pub near_threshold_m: f64,
    /// Cap on earned reasons, excluding the sponsorship disclosure.
    pub max_reasons: usize,
    /// Target count that soft reasons pad up to.
    pub min_reasons: usize,
    /// Minimum sub-score for a soft reason.
    pub soft_threshold: f64,
}

impl Default for ReasonConfig {
    fn default() -> Self {
        Self {
            signal_threshold: 0.7,
            quality_threshold: 0.8,
            near_threshold_m: 500.0,
            max_reasons: 4,
            min_reasons: 2,
            soft_threshold: 0.5,
        }
    }
}

/// Per-candidate facts that are not part of the score breakdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReasonSignals {
    /// Interest contributing most to the explicit score.
    pub top_interest: Option<Interest>,
    /// Distance from the request origin in metres.
    pub distance_m: f64,
    /// Whether the user favourited the place.
    pub favorite: bool,
    /// Whether the place carries an active sponsorship.
    pub sponsored: bool,
}

impl ReasonConfig {
    /// Derive ordered reasons for one candidate.
    ///
    /// Earned reasons are ordered by the strength of their signal and capped
    /// at `max_reasons`. Soft reasons pad the list up to `min_reasons`. An
    /// active sponsorship is always disclosed last.
    ///
    /// # Errors
    /// Returns [`ReasonError::NonFiniteSignal`] when a sub-score or the
    /// distance is not finite.
    ///
    /// # Examples
    /// ```
    /// use roam_core::{ReasonCode, ScoreBreakdown, ScoreWeights};
    /// use roam_scorer::{ReasonConfig, ReasonSignals};
    ///
    /// let breakdown = ScoreBreakdown {
    ///     implicit: 0.5,
    ///     explicit: 0.6,
    ///     novelty: 1.0,
    ///     quality: 0.5,
    ///     context: 0.0,
    ///     weights: ScoreWeights::default(),
    ///     final_score: 0.6,
    /// };
    /// let signals = ReasonSignals {
    ///     top_interest: None,
    ///     distance_m: 2_000.0,
    ///     favorite: false,
    ///     sponsored: true,
    /// };
    /// let reasons = ReasonConfig::default().explain(&breakdown, &signals)?;
    /// assert_eq!(
    ///     reasons,
    ///     vec![
    ///         ReasonCode::NovelExperience,
    ///         ReasonCode::FitsYourTaste,
    ///         ReasonCode::Sponsored,
    ///     ]
    /// );
    /// # Ok::<(), roam_scorer::ReasonError>(())
    /// ```
    pub fn explain(
        &self,
        breakdown: &ScoreBreakdown,
        signals: &ReasonSignals,
    ) -> Result<Vec<ReasonCode>, ReasonError> {
        for (signal, value) in [
            ("implicit", breakdown.implicit),
            ("explicit", breakdown.explicit),
            ("novelty", breakdown.novelty),
            ("quality", breakdown.quality),
            ("context", breakdown.context),
            ("distance", signals.distance_m),
        ] {
            if !value.is_finite() {
                return Err(ReasonError::NonFiniteSignal { signal, value });
            }
        }

        let mut earned = self.earned(breakdown, signals);
        earned.sort_by(|a, b| b.1.total_cmp(&a.1));
        let mut reasons: Vec<ReasonCode> = earned
            .into_iter()
            .take(self.max_reasons)
            .map(|(code, _)| code)
            .collect();

        let target = self.min_reasons.min(self.max_reasons);
        if reasons.len() < target {
            let mut soft = self.soft(breakdown, &reasons);
            soft.sort_by(|a, b| b.1.total_cmp(&a.1));
            let missing = target - reasons.len();
            reasons.extend(soft.into_iter().take(missing).map(|(code, _)| code));
        }

        if signals.sponsored {
            reasons.push(ReasonCode::Sponsored);
        }
        Ok(reasons)
    }

    fn earned(&self, breakdown: &ScoreBreakdown, signals: &ReasonSignals) -> Vec<(ReasonCode, f64)> {
        let threshold = self.signal_threshold;
        let mut earned = Vec::new();
        if breakdown.explicit >= threshold
            && let Some(interest) = signals.top_interest
        {
            earned.push((ReasonCode::MatchesInterest(interest), breakdown.explicit));
        }
        if breakdown.implicit >= threshold {
            earned.push((ReasonCode::MatchesYourHistory, breakdown.implicit));
        }
        if breakdown.novelty >= threshold {
            earned.push((ReasonCode::NovelExperience, breakdown.novelty));
        }
        if breakdown.quality >= self.quality_threshold {
            earned.push((ReasonCode::HighlyRated, breakdown.quality));
        }
        if breakdown.context >= threshold {
            earned.push((ReasonCode::GoodForRightNow, breakdown.context));
        }
        if self.near_threshold_m > 0.0 && signals.distance_m <= self.near_threshold_m {
            let closeness = 1.0 - signals.distance_m.max(0.0) / self.near_threshold_m;
            earned.push((ReasonCode::CloseToYou, closeness));
        }
        if signals.favorite {
            earned.push((ReasonCode::PreviousFavorite, 1.0));
        }
        earned
    }

    fn soft(&self, breakdown: &ScoreBreakdown, chosen: &[ReasonCode]) -> Vec<(ReasonCode, f64)> {
        let has_interest = chosen
            .iter()
            .any(|code| matches!(code, ReasonCode::MatchesInterest(_)));
        let candidates = [
            (ReasonCode::FitsYourTaste, breakdown.explicit, has_interest),
            (
                ReasonCode::SomethingDifferent,
                breakdown.novelty,
                chosen.contains(&ReasonCode::NovelExperience),
            ),
            (
                ReasonCode::WellReviewed,
                breakdown.quality,
                chosen.contains(&ReasonCode::HighlyRated),
            ),
        ];
        candidates
            .into_iter()
            .filter(|(_, value, covered)| !covered && *value >= self.soft_threshold)
            .map(|(code, value, _)| (code, value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roam_core::ScoreWeights;
    use rstest::{fixture, rstest};

    #[fixture]
    fn breakdown() -> ScoreBreakdown {
        ScoreBreakdown {
            implicit: 0.5,
            explicit: 0.5,
            novelty: 0.5,
            quality: 0.5,
            context: 0.0,
            weights: ScoreWeights::default(),
            final_score: 0.5,
        }
    }

    #[fixture]
    fn signals() -> ReasonSignals {
        ReasonSignals {
            top_interest: Some(Interest::Food),
            distance_m: 5_000.0,
            favorite: false,
            sponsored: false,
        }
    }

    #[rstest]
    fn strong_signals_are_ordered_and_capped(mut breakdown: ScoreBreakdown, mut signals: ReasonSignals) {
        breakdown.explicit = 0.95;
        breakdown.implicit = 0.8;
        breakdown.novelty = 0.9;
        breakdown.quality = 0.85;
        breakdown.context = 0.75;
        signals.distance_m = 250.0;
        let reasons = ReasonConfig::default()
            .explain(&breakdown, &signals)
            .unwrap_or_default();
        assert_eq!(
            reasons,
            vec![
                ReasonCode::MatchesInterest(Interest::Food),
                ReasonCode::NovelExperience,
                ReasonCode::HighlyRated,
                ReasonCode::MatchesYourHistory,
            ]
        );
    }

    #[rstest]
    fn soft_reasons_pad_weak_candidates(mut breakdown: ScoreBreakdown, signals: ReasonSignals) {
        breakdown.explicit = 0.6;
        breakdown.quality = 0.55;
        let reasons = ReasonConfig::default()
            .explain(&breakdown, &signals)
            .unwrap_or_default();
        assert_eq!(reasons, vec![ReasonCode::FitsYourTaste, ReasonCode::WellReviewed]);
    }

    #[rstest]
    fn nothing_to_say_yields_no_reasons(mut breakdown: ScoreBreakdown, signals: ReasonSignals) {
        breakdown.explicit = 0.2;
        breakdown.novelty = 0.1;
        breakdown.quality = 0.3;
        let reasons = ReasonConfig::default().explain(&breakdown, &signals);
        assert_eq!(reasons, Ok(Vec::new()));
    }

    #[rstest]
    fn sponsorship_is_disclosed_beyond_the_cap(mut breakdown: ScoreBreakdown, mut signals: ReasonSignals) {
        breakdown.explicit = 0.9;
        breakdown.implicit = 0.9;
        breakdown.novelty = 0.9;
        breakdown.quality = 0.9;
        signals.favorite = true;
        signals.sponsored = true;
        let reasons = ReasonConfig::default()
            .explain(&breakdown, &signals)
            .unwrap_or_default();
        assert_eq!(reasons.len(), 5);
        assert_eq!(reasons.first(), Some(&ReasonCode::PreviousFavorite));
        assert_eq!(reasons.last(), Some(&ReasonCode::Sponsored));
    }

    #[rstest]
    fn non_finite_signals_are_rejected(breakdown: ScoreBreakdown, mut signals: ReasonSignals) {
        signals.distance_m = f64::NAN;
        assert!(matches!(
            ReasonConfig::default().explain(&breakdown, &signals),
            Err(ReasonError::NonFiniteSignal { signal: "distance", .. })
        ));
    }
}
