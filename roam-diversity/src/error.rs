//! Error types raised by the selection strategies.

use thiserror::Error;

/// Errors raised when a strategy is given unusable parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiversityError {
    /// Exploration probability outside `0.0..=1.0`.
    #[error("epsilon must lie in 0..=1, got {value}")]
    InvalidEpsilon {
        /// Offending value.
        value: f64,
    },
    /// Softmax temperature that is not a finite positive number.
    #[error("temperature must be finite and positive, got {value}")]
    InvalidTemperature {
        /// Offending value.
        value: f64,
    },
    /// Relevance trade-off outside `0.0..=1.0`.
    #[error("lambda must lie in 0..=1, got {value}")]
    InvalidLambda {
        /// Offending value.
        value: f64,
    },
    /// Arm evidence that cannot parameterise a Beta distribution.
    #[error("invalid Beta parameters alpha={alpha}, beta={beta}")]
    InvalidBetaParameters {
        /// First shape parameter.
        alpha: f64,
        /// Second shape parameter.
        beta: f64,
    },
}
