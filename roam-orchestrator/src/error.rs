//! Errors surfaced by the orchestrator.

use roam_core::{RouteError, StoreError, ValidationError, WeightsError};
use roam_diversity::DiversityError;
use thiserror::Error;

/// A configuration value the engine cannot run with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Score weights are negative, non-finite or sum past one.
    #[error(transparent)]
    Weights(#[from] WeightsError),
    /// A diversity strategy carries an out-of-range parameter.
    #[error(transparent)]
    Diversity(#[from] DiversityError),
    /// The scoring pool was configured without workers.
    #[error("scoring_workers must be at least 1")]
    NoWorkers,
    /// The candidate pool factor was zero.
    #[error("candidate_pool_factor must be at least 1")]
    EmptyCandidatePool,
    /// Profile updates were configured without any attempt.
    #[error("profile_update_retries must be at least 1")]
    NoRetries,
    /// The feedback learning rate is outside `(0, 1]`.
    #[error("feedback_learning_rate must lie in (0, 1], got {value}")]
    LearningRate {
        /// Offending value.
        value: f64,
    },
    /// The novelty emphasis is outside `[0, 1]`.
    #[error("novelty_emphasis must lie in [0, 1], got {value}")]
    NoveltyEmphasis {
        /// Offending value.
        value: f64,
    },
    /// The scoring pool could not be started.
    #[error("failed to start the scoring pool: {message}")]
    WorkerPool {
        /// Description from the pool builder.
        message: String,
    },
}

/// Failure of an orchestrator operation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The request failed validation; nothing was read or written.
    #[error("invalid request: {}", describe(.0))]
    InvalidInput(Vec<ValidationError>),
    /// Concurrent writers kept moving the taste profile on.
    #[error("taste profile for {user_id} changed concurrently {attempts} times")]
    ConcurrencyConflict {
        /// Affected user.
        user_id: String,
        /// Update attempts made before giving up.
        attempts: u32,
    },
    /// The history or profile store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// No route could be built for the selected places.
    #[error(transparent)]
    Route(#[from] RouteError),
    /// The caller cancelled the request before it completed.
    #[error("request cancelled")]
    Cancelled,
    /// The engine configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn describe(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
