//! Core domain types for the Roam suggestion engine.
//!
//! The crate defines places, interest vectors, taste profiles, history
//! records, intent policy, route types and the traits through which the
//! engine reaches storage, travel-cost and catalogue collaborators. Scoring,
//! diversity selection and route optimisation live in sibling crates and
//! build on these types.

#![forbid(unsafe_code)]

pub mod category;
pub mod clock;
pub mod external;
pub mod history;
pub mod intent;
pub mod interest;
pub mod place;
pub mod profile;
pub mod request;
pub mod route;
pub mod scorer;
pub mod snapshot;
pub mod store;
pub mod test_support;
pub mod travel_cost;

pub use clock::{Clock, SystemClock};
pub use external::{
    ContextInsights, ContextInsightsProvider, PlaceQuery, PlaceSearch, SearchError, Season,
    TimeOfDay, Weather,
};
pub use history::{
    DEFAULT_EXCLUSION_WINDOW, ExclusionEntry, FEEDBACK_LOG_LIMIT, FavoriteEntry, FeedbackEvent,
    FeedbackKind, NewRoute, NewSuggestion, ROUTE_HISTORY_LIMIT, RouteHistoryEntry,
    SUGGESTION_HISTORY_LIMIT, SuggestionHistoryEntry,
};
pub use intent::{
    CategoryRule, DiversityLevel, Intent, IntentLimits, IntentPolicy, QUICK_SUGGESTION_RESULTS,
    apply_intent_filter, validate_request,
};
pub use interest::{Interest, InterestVector};
pub use place::{Place, SponsorshipWindow};
pub use profile::{NEUTRAL_WEIGHT, QuizAnswer, TasteProfile};
pub use request::{SuggestionRequest, ValidationError};
pub use route::{OptimizationMethod, OptimizedRoute, RouteError, RouteLeg, TravelMode, Waypoint};
pub use scorer::{
    ReasonCode, ScoreBreakdown, ScoreWeights, ScoredCandidate, Scorer, ScoringContext,
    WeightsError, sanitise,
};
pub use snapshot::UserSnapshot;
pub use store::{
    HistoryStore, MemoryHistoryStore, MemoryTasteProfileStore, ProfileStoreError, StoreError,
    TasteProfileStore,
};
#[cfg(feature = "store-sqlite")]
pub use store::SqliteUserStore;
pub use test_support::{
    FailingPlaceSearch, FailingTravelCostProvider, FixedClock, StaticInsights, StaticPlaceSearch,
    UnitTravelCostProvider,
};
pub use travel_cost::{
    DRIVING_SPEED_KMH, HaversineTravelCost, TravelCost, TravelCostError, TravelCostMatrix,
    TravelCostProvider, WALKING_SPEED_KMH, haversine_m,
};
