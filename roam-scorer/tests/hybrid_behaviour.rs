#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

//! Behavioural coverage for hybrid scoring and explanations.

use std::cell::RefCell;

use chrono::DateTime;
use geo::Coord;
use roam_core::{
    Interest, InterestVector, Place, ReasonCode, ScoreWeights, ScoredCandidate, ScoringContext,
    TasteProfile, UserSnapshot, test_support::place_near,
};
use roam_scorer::HybridScorer;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

const ORIGIN: Coord<f64> = Coord { x: -3.1883, y: 55.9533 };

/// Aggregate fixtures shared across the BDD scenarios.
struct TestContext {
    snapshot: RefCell<UserSnapshot>,
    candidates: RefCell<Vec<Place>>,
    ranked: RefCell<Vec<ScoredCandidate>>,
}

#[fixture]
fn context() -> TestContext {
    TestContext {
        snapshot: RefCell::new(UserSnapshot::empty("walker")),
        candidates: RefCell::new(Vec::new()),
        ranked: RefCell::new(Vec::new()),
    }
}

fn find<'a>(ranked: &'a [ScoredCandidate], id: &str) -> &'a ScoredCandidate {
    ranked
        .iter()
        .find(|candidate| candidate.place.id == id)
        .expect("candidate should be ranked")
}

#[given("a user whose taste profile favours food over culture")]
fn food_lover(context: &TestContext) {
    let mut profile = TasteProfile::neutral("walker");
    profile.interests = InterestVector::new()
        .with_weight(Interest::Food, 0.9)
        .with_weight(Interest::Culture, 0.2);
    *context.snapshot.borrow_mut() = UserSnapshot::empty("walker").with_profile(profile);
}

#[given("a user without a taste profile")]
fn no_profile(context: &TestContext) {
    *context.snapshot.borrow_mut() = UserSnapshot::empty("walker");
}

#[given("a well-reviewed restaurant and a thinly reviewed museum nearby")]
fn restaurant_and_museum(context: &TestContext) {
    *context.candidates.borrow_mut() = vec![
        place_near(ORIGIN, "restaurant-a", "food", 120.0, 80.0).with_rating(4.5, 200),
        place_near(ORIGIN, "museum-b", "culture", -90.0, 150.0).with_rating(4.8, 10),
    ];
}

#[when("the candidates are scored")]
fn score_candidates(context: &TestContext) {
    let scorer = HybridScorer::new(ScoreWeights::default()).expect("default weights are valid");
    let now = DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp");
    let ranked = scorer.score_and_explain(
        &context.snapshot.borrow(),
        context.candidates.borrow().clone(),
        &ScoringContext::new(ORIGIN, now),
    );
    *context.ranked.borrow_mut() = ranked;
}

#[then("the restaurant has the higher explicit score")]
fn restaurant_explicit_wins(context: &TestContext) {
    let ranked = context.ranked.borrow();
    let restaurant = find(&ranked, "restaurant-a");
    let museum = find(&ranked, "museum-b");
    assert!(restaurant.breakdown.explicit > museum.breakdown.explicit);
    assert_eq!(restaurant.breakdown.implicit, museum.breakdown.implicit);
    assert_eq!(restaurant.breakdown.novelty, museum.breakdown.novelty);
}

#[then("the restaurant is ranked first")]
fn restaurant_first(context: &TestContext) {
    let ranked = context.ranked.borrow();
    let ids: Vec<_> = ranked.iter().map(|c| c.place.id.as_str()).collect();
    assert_eq!(ids, vec!["restaurant-a", "museum-b"]);
}

#[then("the restaurant is explained by its food interest")]
fn restaurant_reasons(context: &TestContext) {
    let ranked = context.ranked.borrow();
    let restaurant = find(&ranked, "restaurant-a");
    assert!(
        restaurant
            .reasons
            .contains(&ReasonCode::MatchesInterest(Interest::Food))
    );
    assert!(restaurant.reasons.len() <= 4);
    assert!(restaurant.reasons.contains(&ReasonCode::CloseToYou));
}

#[then("every explicit score is exactly one half")]
fn explicit_neutral(context: &TestContext) {
    for candidate in context.ranked.borrow().iter() {
        assert_eq!(candidate.breakdown.explicit, 0.5);
    }
}

#[then("every sub-score and final score lies between zero and one")]
fn scores_in_range(context: &TestContext) {
    for candidate in context.ranked.borrow().iter() {
        let breakdown = candidate.breakdown;
        for value in [
            breakdown.implicit,
            breakdown.explicit,
            breakdown.novelty,
            breakdown.quality,
            breakdown.context,
            breakdown.final_score,
        ] {
            assert!((0.0..=1.0).contains(&value), "{value}");
        }
    }
}

#[scenario(path = "tests/features/hybrid_scorer.feature", index = 0)]
fn food_lover_prefers_restaurant(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/hybrid_scorer.feature", index = 1)]
fn missing_profile_is_neutral(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/hybrid_scorer.feature", index = 2)]
fn scores_are_clamped(context: TestContext) {
    let _ = context;
}
