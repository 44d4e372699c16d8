//! Property-based tests for the suggestion pipeline.
//!
//! # Invariants tested
//!
//! - **Bounded:** never more suggestions than the intent allows.
//! - **Filtered:** excluded places never appear; food-only requests only
//!   return food.
//! - **Unique:** no place is suggested twice in one response.
//! - **Routed:** route-planning responses route every suggestion.
//! - **Reproducible:** the same seed over the same state gives the same
//!   suggestions.

use std::collections::HashSet;
use std::sync::Arc;

use geo::Coord;
use proptest::prelude::*;
use roam_core::{
    FixedClock, HistoryStore, Intent, IntentLimits, MemoryHistoryStore, MemoryTasteProfileStore,
    Place, StaticPlaceSearch, SuggestionRequest, category::is_food_category,
    test_support::place_near,
};
use roam_orchestrator::{
    CancellationToken, Collaborators, EngineConfig, EngineError, Orchestrator, SuggestionResponse,
};

const ORIGIN: Coord<f64> = Coord { x: 13.405, y: 52.52 };
const CATEGORIES: [&str; 8] = [
    "restaurant",
    "cafe",
    "museum",
    "park",
    "bar",
    "gallery",
    "spa",
    "stadium",
];

fn catalogue_strategy() -> impl Strategy<Value = Vec<Place>> {
    prop::collection::vec(
        (0..CATEGORIES.len(), -1_500.0_f64..1_500.0, -1_500.0_f64..1_500.0),
        0..30,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(n, (category, east, north))| {
                let category = CATEGORIES.get(category).copied().unwrap_or("park");
                place_near(ORIGIN, &format!("p{n}"), category, east, north)
            })
            .collect()
    })
}

fn intent_strategy() -> impl Strategy<Value = Intent> {
    prop::sample::select(Intent::ALL.to_vec())
}

fn engine(places: Vec<Place>, excluded: &[String]) -> Result<Orchestrator, TestCaseError> {
    let history = Arc::new(MemoryHistoryStore::default());
    let collaborators = Collaborators::new(
        Arc::clone(&history) as Arc<dyn HistoryStore>,
        Arc::new(MemoryTasteProfileStore::default()),
        Arc::new(StaticPlaceSearch::with_places(places)),
    )
    .with_clock(Arc::new(FixedClock::epoch()));
    let engine = Orchestrator::new(EngineConfig::default(), collaborators)
        .map_err(|error| TestCaseError::fail(error.to_string()))?;
    for place_id in excluded {
        engine
            .exclude_place("u", place_id, "not interested", None)
            .map_err(|error| TestCaseError::fail(error.to_string()))?;
    }
    Ok(engine)
}

fn request(intent: Intent, seed: u64) -> SuggestionRequest {
    SuggestionRequest::new("u", ORIGIN.y, ORIGIN.x, 2_500.0, intent)
        .with_walking_distance(1_800.0)
        .with_seed(seed)
}

fn serve(engine: &Orchestrator, request: &SuggestionRequest) -> Result<SuggestionResponse, TestCaseError> {
    engine
        .suggest(request, &CancellationToken::new())
        .map_err(|error: EngineError| TestCaseError::fail(error.to_string()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn responses_respect_policy_and_exclusions(
        places in catalogue_strategy(),
        intent in intent_strategy(),
        excluded_every in 2_usize..5,
        seed in any::<u64>(),
    ) {
        let excluded: Vec<String> = places
            .iter()
            .step_by(excluded_every)
            .map(|place| place.id.clone())
            .collect();
        let engine = engine(places.clone(), &excluded)?;
        let request = request(intent, seed);
        let response = serve(&engine, &request)?;

        let policy = intent.policy(&IntentLimits::default());
        prop_assert!(response.suggestions.len() <= policy.result_count(None));

        let ids = response.place_ids();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        prop_assert_eq!(unique.len(), ids.len());
        prop_assert!(ids.iter().all(|id| !excluded.iter().any(|blocked| blocked.as_str() == *id)));

        if intent == Intent::FoodOnly {
            prop_assert!(response
                .suggestions
                .iter()
                .all(|candidate| is_food_category(&candidate.place.category)));
        }

        if policy.route_required && !ids.is_empty() {
            let route = response.route.as_ref().ok_or_else(|| TestCaseError::fail("route missing"))?;
            let routed: HashSet<String> = route.waypoint_ids().into_iter().collect();
            let suggested: HashSet<String> = ids.iter().map(|id| (*id).to_owned()).collect();
            prop_assert_eq!(routed, suggested);
        } else if !policy.route_required {
            prop_assert!(response.route.is_none());
        }
    }

    #[test]
    fn the_same_seed_gives_the_same_suggestions(
        places in catalogue_strategy(),
        intent in intent_strategy(),
        seed in any::<u64>(),
    ) {
        let first = serve(&engine(places.clone(), &[])?, &request(intent, seed))?;
        let second = serve(&engine(places, &[])?, &request(intent, seed))?;
        prop_assert_eq!(first.place_ids(), second.place_ids());
        prop_assert_eq!(first.strategy, second.strategy);
    }
}
