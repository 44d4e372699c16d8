//! Failures of individual solver stages.

use thiserror::Error;

/// Why a solver stage could not produce an ordering.
///
/// Stage failures are never returned to callers: the optimizer logs them
/// and falls back to the next stage.
#[derive(Debug, Clone, PartialEq, Error)]
pub(crate) enum StageError {
    /// The instance exceeds what the stage can hold in memory.
    #[error("{waypoints} waypoints exceed the limit of {limit}")]
    TooLarge { waypoints: usize, limit: usize },
    /// An edge cost was NaN, infinite or negative.
    #[error("edge {from} -> {to} has unusable cost {cost}")]
    UnusableCost { from: usize, to: usize, cost: f64 },
}
