//! `Orchestrator`: the request pipeline from validation to persisted
//! history.

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use geo::Coord;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::ThreadPoolBuilder;
use roam_core::{
    ContextInsights, FEEDBACK_LOG_LIMIT, FeedbackKind, IntentPolicy, NewRoute, NewSuggestion,
    OptimizedRoute, Place, PlaceQuery, ScoredCandidate, ScoringContext, SuggestionRequest,
    TravelCostProvider, TravelMode, UserSnapshot, Waypoint, apply_intent_filter, haversine_m,
    validate_request,
};
use roam_diversity::{Arm, DiversityStrategy, epsilon_greedy, mmr, softmax, thompson};
use roam_scorer::HybridScorer;
use roam_solver_tsp::RouteOptimizer;
use tokio_util::sync::CancellationToken;

use crate::similarity::candidate_similarity;
use crate::{Collaborators, ConfigError, Diagnostics, EngineConfig, EngineError, SuggestionResponse};

/// Serves suggestion requests and user actions against shared stores.
///
/// Construction validates the configuration and starts the bounded scoring
/// pool; afterwards the orchestrator is immutable and can be shared across
/// threads behind an [`Arc`].
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use geo::Coord;
/// use roam_core::{Intent, MemoryHistoryStore, MemoryTasteProfileStore, Place, StaticPlaceSearch, SuggestionRequest};
/// use roam_orchestrator::{Collaborators, EngineConfig, Orchestrator};
/// use tokio_util::sync::CancellationToken;
///
/// let catalogue = StaticPlaceSearch::with_places([
///     Place::new("museum", "Museum", "museum", Coord { x: 2.3376, y: 48.8606 }),
/// ]);
/// let collaborators = Collaborators::new(
///     Arc::new(MemoryHistoryStore::default()),
///     Arc::new(MemoryTasteProfileStore::default()),
///     Arc::new(catalogue),
/// );
/// let engine = Orchestrator::new(EngineConfig::default(), collaborators)?;
///
/// let request = SuggestionRequest::new("u1", 48.8606, 2.3376, 1_000.0, Intent::QuickSuggestion);
/// let response = engine.suggest(&request, &CancellationToken::new())?;
/// assert_eq!(response.place_ids(), vec!["museum"]);
/// # Ok::<(), roam_orchestrator::EngineError>(())
/// ```
pub struct Orchestrator {
    pub(crate) collaborators: Collaborators,
    scorer: HybridScorer,
    optimizer: RouteOptimizer<Arc<dyn TravelCostProvider>>,
    pub(crate) config: EngineConfig,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .field("collaborators", &self.collaborators)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// Validate `config` and wire the engine to its collaborators.
    ///
    /// # Errors
    /// Returns [`EngineError::Config`] when the configuration is invalid or
    /// the scoring pool cannot start.
    pub fn new(config: EngineConfig, collaborators: Collaborators) -> Result<Self, EngineError> {
        config.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.scoring_workers)
            .thread_name(|index| format!("roam-scorer-{index}"))
            .build()
            .map_err(|error| ConfigError::WorkerPool {
                message: error.to_string(),
            })?;
        let scorer = HybridScorer::new(config.weights)
            .map_err(ConfigError::from)?
            .with_implicit(config.implicit)
            .with_novelty(config.novelty)
            .with_quality(config.quality)
            .with_reasons(config.reasons)
            .with_pool(Arc::new(pool));
        let optimizer =
            RouteOptimizer::with_config(Arc::clone(&collaborators.travel_cost), config.route);
        Ok(Self {
            collaborators,
            scorer,
            optimizer,
            config,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Produce ranked, explained and diversified suggestions for `request`.
    ///
    /// Catalogue and insight failures degrade to zero candidates and neutral
    /// context. History is written only once the response is complete, and
    /// not at all when `cancel` fires first.
    ///
    /// # Errors
    /// - [`EngineError::InvalidInput`] before any I/O when the request is
    ///   malformed.
    /// - [`EngineError::Cancelled`] when `cancel` fires between stages.
    /// - [`EngineError::Store`] when reading or writing history fails.
    /// - [`EngineError::Route`] when a required route cannot be built.
    pub fn suggest(
        &self,
        request: &SuggestionRequest,
        cancel: &CancellationToken,
    ) -> Result<SuggestionResponse, EngineError> {
        let started_at = Instant::now();
        let problems = validate_request(request);
        if !problems.is_empty() {
            return Err(EngineError::InvalidInput(problems));
        }
        let policy = request.intent.policy(&self.config.intents);
        let count = policy.result_count(request.max_results);
        let now = self.collaborators.clock.now();
        let origin = Coord {
            x: request.longitude,
            y: request.latitude,
        };

        checkpoint(cancel)?;
        let (snapshot, blocked) = self.load_user(&request.user_id, now, cancel)?;
        let level = request.diversity.unwrap_or(policy.diversity);
        let strategy = self
            .config
            .diversity
            .strategy_for(level, snapshot.feedback.len());

        checkpoint(cancel)?;
        let found = self.search(request, count, blocked.len());
        checkpoint(cancel)?;
        let insights = self.insights(request);
        let mut diagnostics = Diagnostics {
            candidates_found: found.len(),
            context_available: insights.is_some(),
            ..Diagnostics::default()
        };

        let candidates = filter_candidates(found, request, &policy, &blocked, origin);
        diagnostics.candidates_filtered = diagnostics.candidates_found.saturating_sub(candidates.len());
        if candidates.is_empty() {
            log::debug!(
                "no candidates left for {} ({}) after filtering {}",
                request.user_id,
                request.intent,
                diagnostics.candidates_filtered,
            );
            diagnostics.elapsed = started_at.elapsed();
            return Ok(SuggestionResponse {
                suggestions: Vec::new(),
                route: None,
                strategy,
                diagnostics,
            });
        }

        let mut context = ScoringContext::new(origin, now);
        if let Some(insights) = insights {
            context = context.with_insights(insights);
        }
        let ranked = self
            .scorer_for(&policy)?
            .score_and_explain(&snapshot, candidates, &context);
        diagnostics.candidates_scored = ranked.len();

        checkpoint(cancel)?;
        let suggestions = self.diversify(ranked, count, strategy, &snapshot, request.seed);
        let route = if policy.route_required {
            self.route_through(origin, &suggestions, request.travel_mode)?
        } else {
            None
        };

        checkpoint(cancel)?;
        self.persist(&request.user_id, &suggestions, route.as_ref(), now)?;
        diagnostics.elapsed = started_at.elapsed();
        log::debug!(
            "served {} suggestions to {} with {} in {:?}",
            suggestions.len(),
            request.user_id,
            strategy,
            diagnostics.elapsed,
        );
        Ok(SuggestionResponse {
            suggestions,
            route,
            strategy,
            diagnostics,
        })
    }

    fn load_user(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> Result<(UserSnapshot, HashSet<String>), EngineError> {
        let history = &self.collaborators.history;
        let profile = self
            .collaborators
            .profiles
            .get(user_id)
            .map_err(|error| crate::actions::profile_failure(user_id, error, 0))?;
        checkpoint(cancel)?;
        let favorites = history
            .favorites(user_id)?
            .into_iter()
            .map(|entry| entry.place_id);
        let suggestion_history = history.suggestion_history(user_id)?;
        let feedback = history.feedback(user_id, FEEDBACK_LOG_LIMIT)?;

        let mut blocked: HashSet<String> = history
            .active_exclusions(user_id, now)?
            .into_iter()
            .map(|entry| entry.place_id)
            .collect();
        blocked.extend(
            suggestion_history
                .iter()
                .take(self.config.exclusion_window)
                .map(|entry| entry.place_id.clone()),
        );

        let mut snapshot = UserSnapshot::empty(user_id)
            .with_favorites(favorites)
            .with_suggestion_history(suggestion_history)
            .with_feedback(feedback);
        snapshot.profile = profile;
        Ok((snapshot, blocked))
    }

    fn search(&self, request: &SuggestionRequest, count: usize, blocked: usize) -> Vec<Place> {
        let query = PlaceQuery {
            latitude: request.latitude,
            longitude: request.longitude,
            radius_m: request.radius_m,
            category_hint: request.category_hint.clone(),
            limit: count
                .saturating_mul(self.config.candidate_pool_factor)
                .saturating_add(blocked),
        };
        self.collaborators
            .search
            .search(&query)
            .inspect_err(|error| log::warn!("catalogue search failed: {error}"))
            .unwrap_or_default()
    }

    fn insights(&self, request: &SuggestionRequest) -> Option<ContextInsights> {
        self.collaborators
            .insights
            .as_ref()?
            .insights(request.latitude, request.longitude)
            .inspect_err(|error| log::warn!("context insights unavailable: {error}"))
            .ok()
    }

    fn scorer_for(&self, policy: &IntentPolicy) -> Result<Cow<'_, HybridScorer>, EngineError> {
        if policy.novelty_emphasis <= 0.0 {
            return Ok(Cow::Borrowed(&self.scorer));
        }
        let weights = self
            .scorer
            .weights()
            .emphasise_novelty(policy.novelty_emphasis);
        let scorer = self.scorer.reweighted(weights).map_err(ConfigError::from)?;
        Ok(Cow::Owned(scorer))
    }

    fn diversify(
        &self,
        ranked: Vec<ScoredCandidate>,
        count: usize,
        strategy: DiversityStrategy,
        snapshot: &UserSnapshot,
        seed: Option<u64>,
    ) -> Vec<ScoredCandidate> {
        let fallback: Vec<ScoredCandidate> = ranked.iter().take(count).cloned().collect();
        let pool_size = count.saturating_mul(self.config.candidate_pool_factor);
        let items: Vec<(ScoredCandidate, f64)> = ranked
            .into_iter()
            .take(pool_size)
            .map(|candidate| {
                let score = candidate.score();
                (candidate, score)
            })
            .collect();
        let mut rng = seed.map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);

        let selected = match strategy {
            DiversityStrategy::EpsilonGreedy { epsilon } => {
                epsilon_greedy(items, count, epsilon, &mut rng)
            }
            DiversityStrategy::Softmax { temperature } => {
                softmax(items, count, temperature, &mut rng)
            }
            DiversityStrategy::Mmr { lambda } => mmr(items, count, lambda, candidate_similarity),
            DiversityStrategy::Thompson => {
                let strength = self.config.diversity.thompson_prior_strength;
                let arms = items
                    .into_iter()
                    .map(|(candidate, score)| {
                        let (positives, negatives) = feedback_counts(snapshot, &candidate.place.id);
                        Arm::from_score(candidate, score, strength, positives, negatives)
                    })
                    .collect();
                thompson(arms, count, &mut rng)
            }
        };
        selected.unwrap_or_else(|error| {
            log::warn!("{strategy} selection failed: {error}; keeping the top {count}");
            fallback
        })
    }

    fn route_through(
        &self,
        origin: Coord<f64>,
        suggestions: &[ScoredCandidate],
        mode: TravelMode,
    ) -> Result<Option<OptimizedRoute>, EngineError> {
        if suggestions.is_empty() {
            return Ok(None);
        }
        let waypoints: Vec<Waypoint> = suggestions
            .iter()
            .map(|candidate| {
                Waypoint::new(candidate.place.id.clone(), candidate.place.location)
                    .with_name(candidate.place.name.clone())
            })
            .collect();
        Ok(Some(self.optimizer.optimize(origin, &waypoints, mode)?))
    }

    fn persist(
        &self,
        user_id: &str,
        suggestions: &[ScoredCandidate],
        route: Option<&OptimizedRoute>,
        now: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        if suggestions.is_empty() {
            return Ok(());
        }
        let entries: Vec<NewSuggestion> = suggestions
            .iter()
            .map(|candidate| NewSuggestion {
                place_id: candidate.place.id.clone(),
                category: candidate.place.category.clone(),
                suggested_at: now,
            })
            .collect();
        let route = route.map(|route| NewRoute {
            waypoint_ids: route.waypoint_ids(),
            total_distance_m: route.total_distance_m,
            created_at: now,
        });
        self.collaborators
            .history
            .record_suggestion_outcome(user_id, &entries, route)?;
        Ok(())
    }

    pub(crate) fn optimizer(&self) -> &RouteOptimizer<Arc<dyn TravelCostProvider>> {
        &self.optimizer
    }
}

fn checkpoint(cancel: &CancellationToken) -> Result<(), EngineError> {
    if cancel.is_cancelled() {
        return Err(EngineError::Cancelled);
    }
    Ok(())
}

/// Apply the intent allow-list, exclusions, de-duplication and, for route
/// planning, the walking radius.
fn filter_candidates(
    found: Vec<Place>,
    request: &SuggestionRequest,
    policy: &IntentPolicy,
    blocked: &HashSet<String>,
    origin: Coord<f64>,
) -> Vec<Place> {
    let walking_limit = request
        .max_walking_distance_m
        .filter(|_| policy.route_required);
    let mut seen = HashSet::new();
    apply_intent_filter(found, request.intent, blocked)
        .into_iter()
        .filter(|place| seen.insert(place.id.clone()))
        .filter(|place| {
            walking_limit.is_none_or(|limit| haversine_m(origin, place.location) <= limit)
        })
        .collect()
}

fn feedback_counts(snapshot: &UserSnapshot, place_id: &str) -> (u32, u32) {
    snapshot
        .feedback
        .iter()
        .filter(|event| event.place_id == place_id)
        .fold((0_u32, 0_u32), |(positives, negatives), event| {
            if event.kind.is_positive() {
                (positives.saturating_add(1), negatives)
            } else if event.kind == FeedbackKind::Disliked {
                (positives, negatives.saturating_add(1))
            } else {
                (positives, negatives)
            }
        })
}
