//! Facade crate for the Roam suggestion engine.
//!
//! This crate re-exports the domain types, the engine and its building
//! blocks. The SQLite user store and the JSON catalogue and OSRM adapters
//! sit behind feature flags.

#![forbid(unsafe_code)]

pub use roam_core::{
    Clock, ContextInsights, ContextInsightsProvider, DiversityLevel, FeedbackEvent, FeedbackKind,
    HistoryStore, Intent, Interest, InterestVector, MemoryHistoryStore, MemoryTasteProfileStore,
    OptimizedRoute, Place, PlaceQuery, PlaceSearch, QuizAnswer, ReasonCode, RouteError,
    ScoreBreakdown, ScoreWeights, ScoredCandidate, StoreError, SuggestionRequest, SystemClock,
    TasteProfile, TasteProfileStore, TravelCostProvider, TravelMode, ValidationError, Waypoint,
};

#[cfg(feature = "store-sqlite")]
pub use roam_core::SqliteUserStore;

pub use roam_diversity::{DiversityConfig, DiversityStrategy};
pub use roam_orchestrator::{
    CancellationToken, Collaborators, ConfigError, Diagnostics, EngineConfig, EngineError,
    Orchestrator, SuggestionResponse,
};
pub use roam_scorer::HybridScorer;
pub use roam_solver_tsp::{RouteOptimizer, RouteOptimizerConfig};

#[cfg(feature = "data")]
pub use roam_data::{HttpTravelCostProvider, JsonPlaceCatalogue};
