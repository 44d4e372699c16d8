//! Error types raised while explaining scores.

use thiserror::Error;

/// Errors raised when reasons cannot be derived for a candidate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReasonError {
    /// A signal feeding the explanation was not a finite number.
    #[error("signal '{signal}' is not finite: {value}")]
    NonFiniteSignal {
        /// Name of the offending signal.
        signal: &'static str,
        /// Offending value.
        value: f64,
    },
}
