//! Durable per-user history records.
//!
//! Suggestion and route history are bounded most-recently-used logs ordered
//! by a per-user sequence number that the store assigns. Callers submit
//! [`NewSuggestion`] and [`NewRoute`] values; the store returns the persisted
//! entries with their sequence numbers.

use chrono::{DateTime, Utc};

/// Number of suggestion-history rows kept per user.
pub const SUGGESTION_HISTORY_LIMIT: usize = 20;
/// Number of route-history rows kept per user.
pub const ROUTE_HISTORY_LIMIT: usize = 3;
/// Number of feedback events kept per user.
pub const FEEDBACK_LOG_LIMIT: usize = 200;
/// Default number of recent suggestions held back from re-suggestion.
pub const DEFAULT_EXCLUSION_WINDOW: usize = 3;

/// A place the user asked not to see again.
///
/// The entry is active while `expires_at` is absent or in the future.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExclusionEntry {
    /// Excluded place identifier.
    pub place_id: String,
    /// Free-form reason supplied by the user or caller.
    pub reason: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Expiry time; `None` means permanent.
    pub expires_at: Option<DateTime<Utc>>,
}

impl ExclusionEntry {
    /// Report whether the exclusion still applies at `now`.
    ///
    /// # Examples
    /// ```
    /// use chrono::{TimeDelta, Utc};
    /// use roam_core::ExclusionEntry;
    ///
    /// let now = Utc::now();
    /// let entry = ExclusionEntry {
    ///     place_id: "p1".into(),
    ///     reason: "closed".into(),
    ///     created_at: now,
    ///     expires_at: Some(now - TimeDelta::seconds(1)),
    /// };
    /// assert!(!entry.is_active_at(now));
    /// ```
    #[must_use]
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|expiry| expiry > now)
    }
}

/// A place the user marked as a favourite.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FavoriteEntry {
    /// Favourite place identifier.
    pub place_id: String,
    /// When the favourite was recorded.
    pub added_at: DateTime<Utc>,
}

/// A suggestion about to be written to history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSuggestion {
    /// Suggested place identifier.
    pub place_id: String,
    /// Category of the suggested place.
    pub category: String,
    /// When the suggestion was made.
    pub suggested_at: DateTime<Utc>,
}

/// A persisted suggestion-history row.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SuggestionHistoryEntry {
    /// Store-assigned per-user sequence number.
    pub sequence: u64,
    /// Suggested place identifier.
    pub place_id: String,
    /// Category of the suggested place.
    pub category: String,
    /// When the suggestion was made.
    pub suggested_at: DateTime<Utc>,
}

/// A route about to be written to history.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRoute {
    /// Waypoint identifiers in visiting order.
    pub waypoint_ids: Vec<String>,
    /// Total route distance in metres.
    pub total_distance_m: f64,
    /// When the route was produced.
    pub created_at: DateTime<Utc>,
}

/// A persisted route-history row.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteHistoryEntry {
    /// Store-assigned per-user sequence number.
    pub sequence: u64,
    /// Waypoint identifiers in visiting order.
    pub waypoint_ids: Vec<String>,
    /// Total route distance in metres.
    pub total_distance_m: f64,
    /// When the route was produced.
    pub created_at: DateTime<Utc>,
}

/// What the user did with a place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum FeedbackKind {
    /// The user went there.
    Visited,
    /// The user liked the suggestion.
    Liked,
    /// The user disliked the suggestion.
    Disliked,
    /// The user dismissed the suggestion without judgement.
    Skipped,
}

impl FeedbackKind {
    /// Return the storage label of the feedback kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Visited => "visited",
            Self::Liked => "liked",
            Self::Disliked => "disliked",
            Self::Skipped => "skipped",
        }
    }

    /// Report whether the kind signals positive affinity.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        matches!(self, Self::Visited | Self::Liked)
    }
}

impl std::str::FromStr for FeedbackKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "visited" => Ok(Self::Visited),
            "liked" => Ok(Self::Liked),
            "disliked" => Ok(Self::Disliked),
            "skipped" => Ok(Self::Skipped),
            other => Err(format!("unknown feedback kind '{other}'")),
        }
    }
}

/// A single feedback event in the user's learned-preference log.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeedbackEvent {
    /// Place the feedback refers to.
    pub place_id: String,
    /// Category of the place at feedback time.
    pub category: String,
    /// Cuisine of the place, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cuisine: Option<String>,
    /// What happened.
    pub kind: FeedbackKind,
    /// When it happened.
    pub occurred_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case(None, true)]
    #[case(Some(TimeDelta::minutes(5)), true)]
    #[case(Some(TimeDelta::zero()), false)]
    #[case(Some(TimeDelta::minutes(-5)), false)]
    fn exclusion_activity(#[case] offset: Option<TimeDelta>, #[case] expected: bool) {
        let now = Utc::now();
        let entry = ExclusionEntry {
            place_id: "p".into(),
            reason: "not for me".into(),
            created_at: now,
            expires_at: offset.map(|delta| now + delta),
        };
        assert_eq!(entry.is_active_at(now), expected);
    }

    #[rstest]
    #[case(FeedbackKind::Visited)]
    #[case(FeedbackKind::Liked)]
    #[case(FeedbackKind::Disliked)]
    #[case(FeedbackKind::Skipped)]
    fn feedback_kind_labels_parse_back(#[case] kind: FeedbackKind) {
        assert_eq!(FeedbackKind::from_str(kind.as_str()), Ok(kind));
    }
}
