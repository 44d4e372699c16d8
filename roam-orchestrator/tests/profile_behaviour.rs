#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

//! Behavioural coverage for feedback-driven profile updates.

use std::cell::{Cell, RefCell};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::DateTime;
use roam_core::{
    FeedbackEvent, FeedbackKind, FixedClock, HistoryStore, Interest, InterestVector,
    MemoryHistoryStore, MemoryTasteProfileStore, NEUTRAL_WEIGHT, ProfileStoreError,
    StaticPlaceSearch, TasteProfile, TasteProfileStore,
};
use roam_orchestrator::{Collaborators, EngineConfig, EngineError, Orchestrator};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

const USER: &str = "learner";

/// Profile store that reports a version conflict a fixed number of times
/// before delegating.
#[derive(Debug, Default)]
struct ConflictingProfiles {
    inner: MemoryTasteProfileStore,
    conflicts_left: AtomicUsize,
}

impl TasteProfileStore for ConflictingProfiles {
    fn get(&self, user_id: &str) -> Result<Option<TasteProfile>, ProfileStoreError> {
        self.inner.get(user_id)
    }

    fn update(
        &self,
        user_id: &str,
        expected_version: u64,
        interests: InterestVector,
    ) -> Result<TasteProfile, ProfileStoreError> {
        let pending = self.conflicts_left.load(Ordering::SeqCst);
        if pending > 0 {
            self.conflicts_left.store(pending.saturating_sub(1), Ordering::SeqCst);
            return Err(ProfileStoreError::Conflict {
                expected: expected_version,
                actual: expected_version.saturating_add(1),
            });
        }
        self.inner.update(user_id, expected_version, interests)
    }

    fn delete(&self, user_id: &str) -> Result<bool, ProfileStoreError> {
        self.inner.delete(user_id)
    }
}

/// Aggregate fixtures shared across the BDD scenarios.
struct TestContext {
    history: Arc<MemoryHistoryStore>,
    profiles: Arc<ConflictingProfiles>,
    conflicts: Cell<usize>,
    outcome: RefCell<Option<Result<TasteProfile, EngineError>>>,
}

#[fixture]
fn context() -> TestContext {
    TestContext {
        history: Arc::new(MemoryHistoryStore::default()),
        profiles: Arc::new(ConflictingProfiles::default()),
        conflicts: Cell::new(0),
        outcome: RefCell::new(None),
    }
}

fn engine(context: &TestContext) -> Orchestrator {
    context
        .profiles
        .conflicts_left
        .store(context.conflicts.get(), Ordering::SeqCst);
    let collaborators = Collaborators::new(
        Arc::clone(&context.history) as Arc<dyn HistoryStore>,
        Arc::clone(&context.profiles) as Arc<dyn TasteProfileStore>,
        Arc::new(StaticPlaceSearch::default()),
    )
    .with_clock(Arc::new(FixedClock::epoch()));
    Orchestrator::new(EngineConfig::default(), collaborators).expect("default config is valid")
}

fn react(context: &TestContext, kind: FeedbackKind) {
    let event = FeedbackEvent {
        place_id: "museum-1".into(),
        category: "museum".into(),
        cuisine: None,
        kind,
        occurred_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default(),
    };
    let outcome = engine(context).record_feedback(USER, event);
    *context.outcome.borrow_mut() = Some(outcome);
}

fn profile(context: &TestContext) -> TasteProfile {
    match context.outcome.borrow().as_ref() {
        Some(Ok(profile)) => profile.clone(),
        other => panic!("expected an updated profile, got {other:?}"),
    }
}

#[given("a user without a taste profile")]
fn no_profile(context: &TestContext) {
    assert_eq!(context.profiles.get(USER).expect("store is readable"), None);
}

#[given("a profile store that conflicts twice")]
fn conflicts_twice(context: &TestContext) {
    context.conflicts.set(2);
}

#[given("a profile store that conflicts five times")]
fn conflicts_five_times(context: &TestContext) {
    context.conflicts.set(5);
}

#[when("the user likes a museum")]
fn likes_museum(context: &TestContext) {
    react(context, FeedbackKind::Liked);
}

#[when("the user skips a museum")]
fn skips_museum(context: &TestContext) {
    react(context, FeedbackKind::Skipped);
}

#[then("the culture weight rises above neutral")]
fn culture_rises(context: &TestContext) {
    let profile = profile(context);
    assert!(profile.weight(Interest::Culture) > NEUTRAL_WEIGHT);
    assert_eq!(
        context.profiles.get(USER).expect("store is readable"),
        Some(profile)
    );
}

#[then("the profile is at version 1")]
fn first_version(context: &TestContext) {
    assert_eq!(profile(context).version, 1);
}

#[then("the profile is at version 0")]
fn unpersisted(context: &TestContext) {
    let profile = profile(context);
    assert_eq!(profile.version, 0);
    assert_eq!(profile.weight(Interest::Culture), NEUTRAL_WEIGHT);
    assert_eq!(context.profiles.get(USER).expect("store is readable"), None);
}

#[then("the feedback log holds one event")]
fn one_event(context: &TestContext) {
    let log = context.history.feedback(USER, 10).expect("log is readable");
    assert_eq!(log.len(), 1);
}

#[then("the update fails with a concurrency conflict after 3 attempts")]
fn fails_with_conflict(context: &TestContext) {
    let outcome = context.outcome.borrow();
    assert!(
        matches!(
            outcome.as_ref(),
            Some(Err(EngineError::ConcurrencyConflict { attempts: 3, .. }))
        ),
        "{outcome:?}"
    );
}

#[scenario(path = "tests/features/profile_updates.feature", index = 0)]
fn liking_strengthens_interest(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/profile_updates.feature", index = 1)]
fn conflicts_are_retried(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/profile_updates.feature", index = 2)]
fn persistent_conflicts_surface(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/profile_updates.feature", index = 3)]
fn skips_do_not_learn(context: TestContext) {
    let _ = context;
}
