use thiserror::Error;

/// Errors from [`crate::travel_cost::TravelCostProvider::cost_matrix`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TravelCostError {
    /// No points were provided.
    ///
    /// The provider requires at least one point to compute a matrix. Callers
    /// should pre-filter input to avoid this condition.
    #[error("at least one point is required")]
    EmptyInput,
    /// The remote routing service could not be reached.
    #[error("routing service unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },
    /// The routing service answered with an unusable matrix.
    #[error("invalid routing response: {message}")]
    InvalidResponse {
        /// Description of the failure.
        message: String,
    },
}
