//! In-memory stores guarded by per-user mutexes.
//!
//! Each user's state sits behind its own [`Mutex`], so sequence assignment
//! and pruning for one user are serialised while different users proceed in
//! parallel.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::{HistoryStore, ProfileStoreError, StoreError, TasteProfileStore};
use crate::{
    ExclusionEntry, FEEDBACK_LOG_LIMIT, FavoriteEntry, FeedbackEvent, InterestVector, NewRoute,
    NewSuggestion, ROUTE_HISTORY_LIMIT, RouteHistoryEntry, SUGGESTION_HISTORY_LIMIT,
    SuggestionHistoryEntry, TasteProfile,
};

#[derive(Debug, Default)]
struct UserHistory {
    next_sequence: u64,
    favorites: Vec<FavoriteEntry>,
    exclusions: HashMap<String, ExclusionEntry>,
    suggestions: VecDeque<SuggestionHistoryEntry>,
    routes: VecDeque<RouteHistoryEntry>,
    feedback: VecDeque<FeedbackEvent>,
}

impl UserHistory {
    fn take_sequence(&mut self) -> u64 {
        self.next_sequence += 1;
        self.next_sequence
    }

    fn push_suggestions(&mut self, entries: &[NewSuggestion]) -> Vec<SuggestionHistoryEntry> {
        let mut stored = Vec::with_capacity(entries.len());
        for entry in entries {
            let row = SuggestionHistoryEntry {
                sequence: self.take_sequence(),
                place_id: entry.place_id.clone(),
                category: entry.category.clone(),
                suggested_at: entry.suggested_at,
            };
            stored.push(row.clone());
            push_bounded(&mut self.suggestions, row, SUGGESTION_HISTORY_LIMIT);
        }
        stored
    }

    fn push_route(&mut self, entry: NewRoute) -> RouteHistoryEntry {
        let row = RouteHistoryEntry {
            sequence: self.take_sequence(),
            waypoint_ids: entry.waypoint_ids,
            total_distance_m: entry.total_distance_m,
            created_at: entry.created_at,
        };
        push_bounded(&mut self.routes, row.clone(), ROUTE_HISTORY_LIMIT);
        row
    }
}

fn push_bounded<T>(log: &mut VecDeque<T>, item: T, cap: usize) {
    log.push_front(item);
    log.truncate(cap);
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex.lock().map_err(|_| StoreError::Poisoned)
}

/// [`HistoryStore`] keeping every user's state in process memory.
///
/// Logs are held newest first and truncated on insert.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    users: Mutex<HashMap<String, Arc<Mutex<UserHistory>>>>,
}

impl MemoryHistoryStore {
    fn user(&self, user_id: &str) -> Result<Arc<Mutex<UserHistory>>, StoreError> {
        let mut users = lock(&self.users)?;
        let user = Arc::clone(users.entry(user_id.to_owned()).or_default());
        Ok(user)
    }

    fn existing(&self, user_id: &str) -> Result<Option<Arc<Mutex<UserHistory>>>, StoreError> {
        Ok(lock(&self.users)?.get(user_id).cloned())
    }

    fn read<R>(
        &self,
        user_id: &str,
        f: impl FnOnce(&UserHistory) -> R,
    ) -> Result<Option<R>, StoreError> {
        let Some(user) = self.existing(user_id)? else {
            return Ok(None);
        };
        let state = lock(&user)?;
        Ok(Some(f(&state)))
    }

    fn write<R>(
        &self,
        user_id: &str,
        f: impl FnOnce(&mut UserHistory) -> R,
    ) -> Result<R, StoreError> {
        let user = self.user(user_id)?;
        let mut state = lock(&user)?;
        Ok(f(&mut state))
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn add_favorite(
        &self,
        user_id: &str,
        place_id: &str,
        added_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.write(user_id, |state| {
            if !state.favorites.iter().any(|f| f.place_id == place_id) {
                state.favorites.insert(
                    0,
                    FavoriteEntry {
                        place_id: place_id.to_owned(),
                        added_at,
                    },
                );
            }
        })
    }

    fn remove_favorite(&self, user_id: &str, place_id: &str) -> Result<bool, StoreError> {
        self.write(user_id, |state| {
            let before = state.favorites.len();
            state.favorites.retain(|f| f.place_id != place_id);
            state.favorites.len() != before
        })
    }

    fn favorites(&self, user_id: &str) -> Result<Vec<FavoriteEntry>, StoreError> {
        Ok(self
            .read(user_id, |state| state.favorites.clone())?
            .unwrap_or_default())
    }

    fn is_favorite(&self, user_id: &str, place_id: &str) -> Result<bool, StoreError> {
        Ok(self
            .read(user_id, |state| {
                state.favorites.iter().any(|f| f.place_id == place_id)
            })?
            .unwrap_or(false))
    }

    fn add_exclusion(&self, user_id: &str, entry: ExclusionEntry) -> Result<(), StoreError> {
        self.write(user_id, |state| {
            state.exclusions.insert(entry.place_id.clone(), entry);
        })
    }

    fn is_excluded(
        &self,
        user_id: &str,
        place_id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        Ok(self
            .read(user_id, |state| {
                state
                    .exclusions
                    .get(place_id)
                    .is_some_and(|entry| entry.is_active_at(now))
            })?
            .unwrap_or(false))
    }

    fn active_exclusions(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<ExclusionEntry>, StoreError> {
        let mut active = self
            .read(user_id, |state| {
                state
                    .exclusions
                    .values()
                    .filter(|entry| entry.is_active_at(now))
                    .cloned()
                    .collect::<Vec<_>>()
            })?
            .unwrap_or_default();
        active.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.place_id.cmp(&b.place_id))
        });
        Ok(active)
    }

    fn purge_expired_exclusions(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let users: Vec<_> = lock(&self.users)?.values().cloned().collect();
        let mut removed = 0;
        for user in users {
            let mut state = lock(&user)?;
            let before = state.exclusions.len();
            state.exclusions.retain(|_, entry| entry.is_active_at(now));
            removed += before - state.exclusions.len();
        }
        log::debug!("purged {removed} expired exclusions");
        Ok(removed)
    }

    fn add_suggestion_batch(
        &self,
        user_id: &str,
        entries: &[NewSuggestion],
    ) -> Result<Vec<SuggestionHistoryEntry>, StoreError> {
        self.write(user_id, |state| state.push_suggestions(entries))
    }

    fn add_route_history(
        &self,
        user_id: &str,
        entry: NewRoute,
    ) -> Result<RouteHistoryEntry, StoreError> {
        self.write(user_id, |state| state.push_route(entry))
    }

    fn record_suggestion_outcome(
        &self,
        user_id: &str,
        suggestions: &[NewSuggestion],
        route: Option<NewRoute>,
    ) -> Result<(), StoreError> {
        self.write(user_id, |state| {
            state.push_suggestions(suggestions);
            if let Some(route) = route {
                state.push_route(route);
            }
        })
    }

    fn suggestion_history(&self, user_id: &str) -> Result<Vec<SuggestionHistoryEntry>, StoreError> {
        Ok(self
            .read(user_id, |state| state.suggestions.iter().cloned().collect())?
            .unwrap_or_default())
    }

    fn route_history(&self, user_id: &str) -> Result<Vec<RouteHistoryEntry>, StoreError> {
        Ok(self
            .read(user_id, |state| state.routes.iter().cloned().collect())?
            .unwrap_or_default())
    }

    fn record_feedback(&self, user_id: &str, event: FeedbackEvent) -> Result<(), StoreError> {
        self.write(user_id, |state| {
            push_bounded(&mut state.feedback, event, FEEDBACK_LOG_LIMIT);
        })
    }

    fn feedback(&self, user_id: &str, limit: usize) -> Result<Vec<FeedbackEvent>, StoreError> {
        Ok(self
            .read(user_id, |state| {
                state.feedback.iter().take(limit).cloned().collect()
            })?
            .unwrap_or_default())
    }

    fn delete_user(&self, user_id: &str) -> Result<(), StoreError> {
        lock(&self.users)?.remove(user_id);
        Ok(())
    }
}

/// [`TasteProfileStore`] keeping profiles in process memory.
#[derive(Debug, Default)]
pub struct MemoryTasteProfileStore {
    profiles: Mutex<HashMap<String, TasteProfile>>,
}

impl MemoryTasteProfileStore {
    /// Create a store seeded with `profiles`, keyed by their user ids.
    pub fn with_profiles<I>(profiles: I) -> Self
    where
        I: IntoIterator<Item = TasteProfile>,
    {
        Self {
            profiles: Mutex::new(
                profiles
                    .into_iter()
                    .map(|profile| (profile.user_id.clone(), profile))
                    .collect(),
            ),
        }
    }
}

impl TasteProfileStore for MemoryTasteProfileStore {
    fn get(&self, user_id: &str) -> Result<Option<TasteProfile>, ProfileStoreError> {
        Ok(lock(&self.profiles)?.get(user_id).cloned())
    }

    fn update(
        &self,
        user_id: &str,
        expected_version: u64,
        interests: InterestVector,
    ) -> Result<TasteProfile, ProfileStoreError> {
        let mut profiles = lock(&self.profiles)?;
        let actual = profiles.get(user_id).map_or(0, |profile| profile.version);
        if actual != expected_version {
            return Err(ProfileStoreError::Conflict {
                expected: expected_version,
                actual,
            });
        }
        let profile = TasteProfile {
            user_id: user_id.to_owned(),
            interests,
            version: actual + 1,
        };
        profiles.insert(user_id.to_owned(), profile.clone());
        Ok(profile)
    }

    fn delete(&self, user_id: &str) -> Result<bool, ProfileStoreError> {
        Ok(lock(&self.profiles)?.remove(user_id).is_some())
    }
}
