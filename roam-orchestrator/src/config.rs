//! Engine configuration, loaded once and validated by
//! [`Orchestrator::new`](crate::Orchestrator::new).

use roam_core::{DEFAULT_EXCLUSION_WINDOW, IntentLimits, ScoreWeights};
use roam_diversity::DiversityConfig;
use roam_scorer::{ImplicitConfig, NoveltyConfig, QualityConfig, ReasonConfig};
use roam_solver_tsp::RouteOptimizerConfig;

use crate::ConfigError;

/// Every tunable of the engine.
///
/// All fields have defaults, so a partial JSON document is a valid
/// configuration.
///
/// # Examples
/// ```
/// use roam_orchestrator::EngineConfig;
///
/// let config: EngineConfig = serde_json::from_str(r#"{ "exclusion_window": 5 }"#)?;
/// assert_eq!(config.exclusion_window, 5);
/// assert_eq!(config.candidate_pool_factor, 4);
/// assert!(config.validate().is_ok());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct EngineConfig {
    /// Weights of the hybrid score.
    pub weights: ScoreWeights,
    /// Behavioural scorer tunables.
    pub implicit: ImplicitConfig,
    /// Novelty scorer tunables.
    pub novelty: NoveltyConfig,
    /// Quality smoothing.
    pub quality: QualityConfig,
    /// Reason thresholds.
    pub reasons: ReasonConfig,
    /// Strategy per diversity level.
    pub diversity: DiversityConfig,
    /// Result counts per intent.
    pub intents: IntentLimits,
    /// Route optimizer limits.
    pub route: RouteOptimizerConfig,
    /// Most recent suggestions held back from the next response.
    pub exclusion_window: usize,
    /// Ranked candidates considered by diversification, as a multiple of the
    /// result count.
    pub candidate_pool_factor: usize,
    /// Threads in the scoring pool.
    pub scoring_workers: usize,
    /// Attempts at a compare-and-swap profile update.
    pub profile_update_retries: u32,
    /// Step size of feedback nudges to the taste profile.
    pub feedback_learning_rate: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            implicit: ImplicitConfig::default(),
            novelty: NoveltyConfig::default(),
            quality: QualityConfig::default(),
            reasons: ReasonConfig::default(),
            diversity: DiversityConfig::default(),
            intents: IntentLimits::default(),
            route: RouteOptimizerConfig::default(),
            exclusion_window: DEFAULT_EXCLUSION_WINDOW,
            candidate_pool_factor: 4,
            scoring_workers: 4,
            profile_update_retries: 3,
            feedback_learning_rate: 0.1,
        }
    }
}

impl EngineConfig {
    /// Check the configuration can drive the engine.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;
        self.diversity.validate()?;
        if self.scoring_workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.candidate_pool_factor == 0 {
            return Err(ConfigError::EmptyCandidatePool);
        }
        if self.profile_update_retries == 0 {
            return Err(ConfigError::NoRetries);
        }
        let rate = self.feedback_learning_rate;
        if !rate.is_finite() || rate <= 0.0 || rate > 1.0 {
            return Err(ConfigError::LearningRate { value: rate });
        }
        let emphasis = self.intents.novelty_emphasis;
        if !(0.0..=1.0).contains(&emphasis) {
            return Err(ConfigError::NoveltyEmphasis { value: emphasis });
        }
        Ok(())
    }
}
