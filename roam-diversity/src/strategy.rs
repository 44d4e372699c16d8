//! Mapping from diversity levels to concrete strategies.

use std::fmt;

use roam_core::DiversityLevel;

use crate::DiversityError;

/// A selection strategy with its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum DiversityStrategy {
    /// Exploit the best item, exploring with probability `epsilon`.
    EpsilonGreedy {
        /// Exploration probability.
        epsilon: f64,
    },
    /// Sample by `exp(score / temperature)`.
    Softmax {
        /// Sampling temperature.
        temperature: f64,
    },
    /// Maximal marginal relevance.
    Mmr {
        /// Relevance weight against redundancy.
        lambda: f64,
    },
    /// Thompson sampling over score-centred Beta arms.
    Thompson,
}

impl DiversityStrategy {
    /// Stable name used in responses and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::EpsilonGreedy { .. } => "epsilon_greedy",
            Self::Softmax { .. } => "softmax",
            Self::Mmr { .. } => "mmr",
            Self::Thompson => "thompson",
        }
    }

    /// Check the strategy's parameters.
    ///
    /// # Errors
    /// Returns the [`DiversityError`] the strategy would raise at selection
    /// time.
    pub fn validate(self) -> Result<(), DiversityError> {
        match self {
            Self::EpsilonGreedy { epsilon } if !(0.0..=1.0).contains(&epsilon) => {
                Err(DiversityError::InvalidEpsilon { value: epsilon })
            }
            Self::Softmax { temperature } if !temperature.is_finite() || temperature <= 0.0 => {
                Err(DiversityError::InvalidTemperature { value: temperature })
            }
            Self::Mmr { lambda } if !(0.0..=1.0).contains(&lambda) => {
                Err(DiversityError::InvalidLambda { value: lambda })
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for DiversityStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which strategy each [`DiversityLevel`] uses.
///
/// # Examples
/// ```
/// use roam_core::DiversityLevel;
/// use roam_diversity::{DiversityConfig, DiversityStrategy};
///
/// let config = DiversityConfig::default();
/// assert_eq!(
///     config.strategy_for(DiversityLevel::Medium, 0),
///     DiversityStrategy::Mmr { lambda: 0.7 }
/// );
/// assert_eq!(
///     config.strategy_for(DiversityLevel::High, 50),
///     DiversityStrategy::Thompson
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct DiversityConfig {
    /// Strategy for [`DiversityLevel::Low`].
    pub low: DiversityStrategy,
    /// Strategy for [`DiversityLevel::Medium`].
    pub medium: DiversityStrategy,
    /// Strategy for [`DiversityLevel::High`] with little feedback.
    pub high: DiversityStrategy,
    /// Feedback events needed before high diversity switches to Thompson
    /// sampling.
    pub thompson_min_feedback: usize,
    /// Pseudo-observations contributed by the score to each Thompson arm.
    pub thompson_prior_strength: f64,
}

impl Default for DiversityConfig {
    fn default() -> Self {
        Self {
            low: DiversityStrategy::EpsilonGreedy { epsilon: 0.1 },
            medium: DiversityStrategy::Mmr { lambda: 0.7 },
            high: DiversityStrategy::Softmax { temperature: 0.3 },
            thompson_min_feedback: 20,
            thompson_prior_strength: 10.0,
        }
    }
}

impl DiversityConfig {
    /// Pick the strategy for `level` given how much feedback the user has.
    #[must_use]
    pub const fn strategy_for(&self, level: DiversityLevel, feedback_events: usize) -> DiversityStrategy {
        match level {
            DiversityLevel::Low => self.low,
            DiversityLevel::Medium => self.medium,
            DiversityLevel::High if feedback_events >= self.thompson_min_feedback => {
                DiversityStrategy::Thompson
            }
            DiversityLevel::High => self.high,
        }
    }

    /// Check every configured strategy.
    ///
    /// # Errors
    /// Returns the first [`DiversityError`] found, or
    /// [`DiversityError::InvalidBetaParameters`] when the Thompson prior
    /// strength is negative or not finite.
    pub fn validate(&self) -> Result<(), DiversityError> {
        self.low.validate()?;
        self.medium.validate()?;
        self.high.validate()?;
        let strength = self.thompson_prior_strength;
        if !strength.is_finite() || strength < 0.0 {
            return Err(DiversityError::InvalidBetaParameters {
                alpha: strength,
                beta: strength,
            });
        }
        Ok(())
    }
}
