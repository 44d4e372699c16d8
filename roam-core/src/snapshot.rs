//! Read-only view of a user's state, fetched once per request.

use std::collections::HashSet;

use crate::{FeedbackEvent, SuggestionHistoryEntry, TasteProfile};

/// Everything the scorers may know about a user.
///
/// Histories are ordered newest first. Scorers treat the snapshot as
/// immutable, so one instance can be shared across worker threads.
///
/// # Examples
/// ```
/// use roam_core::{TasteProfile, UserSnapshot};
///
/// let snapshot = UserSnapshot::empty("u1").with_profile(TasteProfile::neutral("u1"));
/// assert!(snapshot.has_no_history());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserSnapshot {
    /// Owner of the snapshot.
    pub user_id: String,
    /// Persisted taste profile, if any.
    pub profile: Option<TasteProfile>,
    /// Favourite place identifiers.
    pub favorites: HashSet<String>,
    /// Recent suggestions, newest first.
    pub suggestion_history: Vec<SuggestionHistoryEntry>,
    /// Feedback log, newest first.
    pub feedback: Vec<FeedbackEvent>,
}

impl UserSnapshot {
    /// Construct a snapshot for a user with no stored state.
    pub fn empty(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    /// Attach a taste profile.
    #[must_use]
    pub fn with_profile(mut self, profile: TasteProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Attach favourite place identifiers.
    #[must_use]
    pub fn with_favorites<I, S>(mut self, favorites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.favorites = favorites.into_iter().map(Into::into).collect();
        self
    }

    /// Attach suggestion history, newest first.
    #[must_use]
    pub fn with_suggestion_history(mut self, history: Vec<SuggestionHistoryEntry>) -> Self {
        self.suggestion_history = history;
        self
    }

    /// Attach the feedback log, newest first.
    #[must_use]
    pub fn with_feedback(mut self, feedback: Vec<FeedbackEvent>) -> Self {
        self.feedback = feedback;
        self
    }

    /// Report whether the user has neither feedback nor favourites.
    #[must_use]
    pub fn has_no_history(&self) -> bool {
        self.feedback.is_empty() && self.favorites.is_empty()
    }

    /// Report whether `place_id` is a favourite.
    #[must_use]
    pub fn is_favorite(&self, place_id: &str) -> bool {
        self.favorites.contains(place_id)
    }
}
