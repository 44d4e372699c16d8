//! Per-user taste profiles with optimistic-concurrency versions.
//!
//! A profile starts neutral (every dimension at `0.5`) and evolves through
//! onboarding quiz answers and feedback nudges. Stores compare the `version`
//! on write; a stale version surfaces as a conflict instead of overwriting.

use crate::{FeedbackKind, Interest, InterestVector, category};

/// Weight every dimension carries before the user expresses any taste.
pub const NEUTRAL_WEIGHT: f64 = 0.5;

/// A user's interest weights and the version they were read at.
///
/// # Examples
/// ```
/// use roam_core::{Interest, TasteProfile};
///
/// let profile = TasteProfile::neutral("user-1");
/// assert_eq!(profile.version, 0);
/// assert_eq!(profile.weight(Interest::Food), 0.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TasteProfile {
    /// Owner of the profile.
    pub user_id: String,
    /// Interest weights in `0.0..=1.0`.
    pub interests: InterestVector,
    /// Monotonic version token; `0` means never persisted.
    pub version: u64,
}

/// One answer from the onboarding quiz.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuizAnswer {
    /// Dimension the question probed.
    pub interest: Interest,
    /// Stated affinity in `0.0..=1.0`.
    pub affinity: f64,
}

impl TasteProfile {
    /// Construct an unpersisted profile with every dimension neutral.
    pub fn neutral(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            interests: InterestVector::uniform(NEUTRAL_WEIGHT),
            version: 0,
        }
    }

    /// Return the weight for `interest`, defaulting to neutral.
    #[must_use]
    pub fn weight(&self, interest: Interest) -> f64 {
        self.interests.weight(interest).unwrap_or(NEUTRAL_WEIGHT)
    }

    /// Overwrite weights with quiz answers.
    ///
    /// Later answers for the same interest win. Dimensions the quiz did not
    /// touch keep their current weight.
    pub fn apply_quiz(&mut self, answers: &[QuizAnswer]) {
        for answer in answers {
            self.interests.set_weight(answer.interest, answer.affinity);
        }
    }

    /// Nudge weights towards the reaction to a place in `category`.
    ///
    /// Positive feedback moves each of the category's dimensions towards
    /// `1.0`, disliking moves them towards `0.0`; the step is
    /// `learning_rate × place_weight × distance_to_target`. Skips and unknown
    /// categories leave the profile untouched. Returns whether any weight
    /// changed.
    ///
    /// # Examples
    /// ```
    /// use roam_core::{FeedbackKind, Interest, TasteProfile};
    ///
    /// let mut profile = TasteProfile::neutral("u");
    /// assert!(profile.apply_feedback("restaurant", FeedbackKind::Liked, 0.2));
    /// assert!((profile.weight(Interest::Food) - 0.6).abs() < 1e-9);
    /// ```
    pub fn apply_feedback(&mut self, category: &str, kind: FeedbackKind, learning_rate: f64) -> bool {
        let target = match kind {
            FeedbackKind::Visited | FeedbackKind::Liked => 1.0,
            FeedbackKind::Disliked => 0.0,
            FeedbackKind::Skipped => return false,
        };
        if !learning_rate.is_finite() || learning_rate <= 0.0 {
            return false;
        }
        let rate = learning_rate.min(1.0);
        let mut changed = false;
        for (interest, place_weight) in category::map_to_interests(category).iter() {
            let current = self.weight(interest);
            let next = current + rate * place_weight * (target - current);
            if (next - current).abs() > f64::EPSILON {
                self.interests.set_weight(interest, next);
                changed = true;
            }
        }
        changed
    }
}
