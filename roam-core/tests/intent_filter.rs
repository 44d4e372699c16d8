//! Property coverage for the intent filter allow-lists.

use std::collections::HashSet;

use geo::Coord;
use proptest::prelude::*;
use roam_core::{Intent, Place, apply_intent_filter, category};

const CATEGORIES: &[&str] = &[
    "restaurant",
    "Cafe",
    "coffee-shop",
    "bar",
    "pub",
    "museum",
    "park",
    "market",
    "FOOD",
    " bakery ",
    "",
    "spaceport",
    "gym",
];

fn arb_place() -> impl Strategy<Value = Place> {
    (0usize..1_000, prop::sample::select(CATEGORIES)).prop_map(|(id, category)| {
        Place::new(format!("p{id}"), "place", category, Coord { x: 0.0, y: 0.0 })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn food_only_never_returns_non_food(places in prop::collection::vec(arb_place(), 0..40)) {
        let kept = apply_intent_filter(places, Intent::FoodOnly, &HashSet::new());
        for place in kept {
            prop_assert!(category::is_food_category(&place.category), "{}", place.category);
        }
    }

    #[test]
    fn activity_only_never_returns_food(places in prop::collection::vec(arb_place(), 0..40)) {
        let kept = apply_intent_filter(places, Intent::ActivityOnly, &HashSet::new());
        for place in kept {
            prop_assert!(!category::is_food_category(&place.category));
        }
    }

    #[test]
    fn excluded_ids_never_survive(
        places in prop::collection::vec(arb_place(), 0..40),
        excluded in prop::collection::hash_set((0usize..1_000).prop_map(|id| format!("p{id}")), 0..200),
    ) {
        let kept = apply_intent_filter(places, Intent::QuickSuggestion, &excluded);
        for place in kept {
            prop_assert!(!excluded.contains(&place.id));
        }
    }

    #[test]
    fn filter_preserves_relative_order(places in prop::collection::vec(arb_place(), 0..40)) {
        let positions: Vec<_> = places.iter().map(|place| place.id.clone()).collect();
        let kept = apply_intent_filter(places, Intent::RoutePlanning, &HashSet::new());
        let kept_ids: Vec<_> = kept.into_iter().map(|place| place.id).collect();
        prop_assert_eq!(kept_ids, positions);
    }
}
