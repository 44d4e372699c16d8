//! Durable per-user state: history logs, favourites, exclusions and taste
//! profiles.
//!
//! [`HistoryStore`] owns the bounded most-recently-used logs. Sequence
//! numbers are assigned by the store, never by callers, and every insert
//! prunes the log back to its cap inside the same atomic unit, so concurrent
//! inserts for one user can never leave more than the cap behind.
//!
//! [`TasteProfileStore`] persists interest weights under optimistic
//! concurrency: an update names the version it read and fails with
//! [`ProfileStoreError::Conflict`] if the stored version has moved on.

use chrono::{DateTime, Utc};

use crate::{
    ExclusionEntry, FavoriteEntry, FeedbackEvent, InterestVector, NewRoute, NewSuggestion,
    RouteHistoryEntry, SuggestionHistoryEntry, TasteProfile,
};

mod error;
mod memory;
#[cfg(feature = "store-sqlite")]
mod sqlite;

pub use error::{ProfileStoreError, StoreError};
pub use memory::{MemoryHistoryStore, MemoryTasteProfileStore};
#[cfg(feature = "store-sqlite")]
pub use sqlite::SqliteUserStore;

/// Bounded per-user history, favourites, exclusions and feedback.
///
/// All listing methods return entries newest first.
///
/// # Examples
///
/// ```rust
/// use chrono::Utc;
/// use roam_core::{HistoryStore, MemoryHistoryStore, NewSuggestion};
///
/// let store = MemoryHistoryStore::default();
/// let now = Utc::now();
/// for n in 0..25 {
///     store.add_suggestion_history(
///         "u1",
///         NewSuggestion { place_id: format!("p{n}"), category: "cafe".into(), suggested_at: now },
///     )?;
/// }
/// assert_eq!(store.suggestion_history("u1")?.len(), 20);
/// assert_eq!(store.recently_excluded_place_ids("u1", 3)?, vec!["p24", "p23", "p22"]);
/// # Ok::<(), roam_core::StoreError>(())
/// ```
pub trait HistoryStore: Send + Sync {
    /// Mark `place_id` as a favourite. Re-adding keeps the original time.
    fn add_favorite(
        &self,
        user_id: &str,
        place_id: &str,
        added_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Remove a favourite, reporting whether one existed.
    fn remove_favorite(&self, user_id: &str, place_id: &str) -> Result<bool, StoreError>;

    /// List favourites, most recently added first.
    fn favorites(&self, user_id: &str) -> Result<Vec<FavoriteEntry>, StoreError>;

    /// Report whether `place_id` is a favourite.
    fn is_favorite(&self, user_id: &str, place_id: &str) -> Result<bool, StoreError>;

    /// Insert or replace the exclusion for `entry.place_id`.
    fn add_exclusion(&self, user_id: &str, entry: ExclusionEntry) -> Result<(), StoreError>;

    /// Report whether a non-expired exclusion exists for `place_id`.
    fn is_excluded(
        &self,
        user_id: &str,
        place_id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    /// List exclusions still active at `now`. Expired rows are skipped.
    fn active_exclusions(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<ExclusionEntry>, StoreError>;

    /// Delete exclusions that expired at or before `now`, for every user.
    ///
    /// Returns the number of rows removed. Intended for periodic sweeps.
    fn purge_expired_exclusions(&self, now: DateTime<Utc>) -> Result<usize, StoreError>;

    /// Append suggestions atomically, pruning to the suggestion cap.
    ///
    /// Entries receive consecutive sequence numbers in slice order.
    fn add_suggestion_batch(
        &self,
        user_id: &str,
        entries: &[NewSuggestion],
    ) -> Result<Vec<SuggestionHistoryEntry>, StoreError>;

    /// Append one suggestion, pruning to the suggestion cap.
    fn add_suggestion_history(
        &self,
        user_id: &str,
        entry: NewSuggestion,
    ) -> Result<SuggestionHistoryEntry, StoreError> {
        self.add_suggestion_batch(user_id, std::slice::from_ref(&entry))?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::corrupt("suggestion insert returned no row"))
    }

    /// Append a route, pruning to the route cap.
    fn add_route_history(
        &self,
        user_id: &str,
        entry: NewRoute,
    ) -> Result<RouteHistoryEntry, StoreError>;

    /// Append a request's suggestions and its route as one atomic unit.
    ///
    /// Either every row is stored and both logs are pruned to their caps, or
    /// nothing is written.
    fn record_suggestion_outcome(
        &self,
        user_id: &str,
        suggestions: &[NewSuggestion],
        route: Option<NewRoute>,
    ) -> Result<(), StoreError>;

    /// List suggestion history, newest first.
    fn suggestion_history(&self, user_id: &str) -> Result<Vec<SuggestionHistoryEntry>, StoreError>;

    /// List route history, newest first.
    fn route_history(&self, user_id: &str) -> Result<Vec<RouteHistoryEntry>, StoreError>;

    /// Place ids from the newest `window` suggestion-history rows.
    fn recently_excluded_place_ids(
        &self,
        user_id: &str,
        window: usize,
    ) -> Result<Vec<String>, StoreError> {
        Ok(self
            .suggestion_history(user_id)?
            .into_iter()
            .take(window)
            .map(|entry| entry.place_id)
            .collect())
    }

    /// Append a feedback event, pruning to the feedback cap.
    fn record_feedback(&self, user_id: &str, event: FeedbackEvent) -> Result<(), StoreError>;

    /// List up to `limit` feedback events, newest first.
    fn feedback(&self, user_id: &str, limit: usize) -> Result<Vec<FeedbackEvent>, StoreError>;

    /// Remove every record held for the user.
    fn delete_user(&self, user_id: &str) -> Result<(), StoreError>;
}

/// Versioned persistence of taste profiles.
pub trait TasteProfileStore: Send + Sync {
    /// Fetch the stored profile, if any.
    fn get(&self, user_id: &str) -> Result<Option<TasteProfile>, ProfileStoreError>;

    /// Compare-and-swap the profile's interests.
    ///
    /// `expected_version` must equal the stored version, or `0` when no
    /// profile exists yet. On success the stored version increments by one
    /// and the new profile is returned.
    fn update(
        &self,
        user_id: &str,
        expected_version: u64,
        interests: InterestVector,
    ) -> Result<TasteProfile, ProfileStoreError>;

    /// Remove the profile, reporting whether one existed.
    fn delete(&self, user_id: &str) -> Result<bool, ProfileStoreError>;
}
