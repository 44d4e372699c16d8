//! User actions outside the suggestion pipeline: feedback, quiz answers,
//! exclusions, favourites, direct routing and account deletion.

use chrono::TimeDelta;
use geo::Coord;
use roam_core::{
    ExclusionEntry, FeedbackEvent, OptimizedRoute, ProfileStoreError, QuizAnswer, TasteProfile,
    TravelMode, ValidationError, Waypoint,
};

use crate::{EngineError, Orchestrator};

impl Orchestrator {
    /// Log `event` and nudge the user's taste profile towards it.
    ///
    /// Skips and categories outside the interest table are logged without
    /// touching the profile.
    ///
    /// # Errors
    /// - [`EngineError::InvalidInput`] for a blank user id.
    /// - [`EngineError::Store`] when the log or profile store fails.
    /// - [`EngineError::ConcurrencyConflict`] when concurrent writers win
    ///   every attempt.
    pub fn record_feedback(
        &self,
        user_id: &str,
        event: FeedbackEvent,
    ) -> Result<TasteProfile, EngineError> {
        require_user(user_id)?;
        let rate = self.config.feedback_learning_rate;
        let category = event.category.clone();
        let kind = event.kind;
        self.collaborators.history.record_feedback(user_id, event)?;
        self.update_profile(user_id, |profile| {
            profile.apply_feedback(&category, kind, rate)
        })
    }

    /// Overwrite profile dimensions with onboarding quiz answers.
    ///
    /// # Errors
    /// As for [`Orchestrator::record_feedback`].
    pub fn apply_quiz(
        &self,
        user_id: &str,
        answers: &[QuizAnswer],
    ) -> Result<TasteProfile, EngineError> {
        require_user(user_id)?;
        self.update_profile(user_id, |profile| {
            let before = profile.interests.clone();
            profile.apply_quiz(answers);
            profile.interests != before
        })
    }

    /// Hide `place_id` from the user's suggestions, for `ttl` or for good.
    ///
    /// # Errors
    /// [`EngineError::InvalidInput`] for a blank user id, otherwise
    /// [`EngineError::Store`].
    pub fn exclude_place(
        &self,
        user_id: &str,
        place_id: &str,
        reason: &str,
        ttl: Option<TimeDelta>,
    ) -> Result<(), EngineError> {
        require_user(user_id)?;
        let now = self.collaborators.clock.now();
        let entry = ExclusionEntry {
            place_id: place_id.to_owned(),
            reason: reason.to_owned(),
            created_at: now,
            expires_at: ttl.and_then(|ttl| now.checked_add_signed(ttl)),
        };
        self.collaborators.history.add_exclusion(user_id, entry)?;
        Ok(())
    }

    /// Mark `place_id` as a favourite.
    ///
    /// # Errors
    /// [`EngineError::InvalidInput`] for a blank user id, otherwise
    /// [`EngineError::Store`].
    pub fn favorite_place(&self, user_id: &str, place_id: &str) -> Result<(), EngineError> {
        require_user(user_id)?;
        let now = self.collaborators.clock.now();
        self.collaborators
            .history
            .add_favorite(user_id, place_id, now)?;
        Ok(())
    }

    /// Remove a favourite, reporting whether it existed.
    ///
    /// # Errors
    /// [`EngineError::InvalidInput`] for a blank user id, otherwise
    /// [`EngineError::Store`].
    pub fn unfavorite_place(&self, user_id: &str, place_id: &str) -> Result<bool, EngineError> {
        require_user(user_id)?;
        Ok(self
            .collaborators
            .history
            .remove_favorite(user_id, place_id)?)
    }

    /// Order `waypoints` into a route starting at `origin`.
    ///
    /// # Errors
    /// [`EngineError::Route`] when there is nothing to route.
    pub fn optimize_route(
        &self,
        origin: Coord<f64>,
        waypoints: &[Waypoint],
        mode: TravelMode,
    ) -> Result<OptimizedRoute, EngineError> {
        Ok(self.optimizer().optimize(origin, waypoints, mode)?)
    }

    /// Erase every record held for the user.
    ///
    /// # Errors
    /// [`EngineError::InvalidInput`] for a blank user id, otherwise
    /// [`EngineError::Store`].
    pub fn delete_user(&self, user_id: &str) -> Result<(), EngineError> {
        require_user(user_id)?;
        self.collaborators.history.delete_user(user_id)?;
        let existed = self
            .collaborators
            .profiles
            .delete(user_id)
            .map_err(|error| profile_failure(user_id, error, 0))?;
        log::debug!("deleted user {user_id} (profile existed: {existed})");
        Ok(())
    }

    /// Drop exclusions that expired before now, returning how many went.
    ///
    /// # Errors
    /// [`EngineError::Store`] when the store fails.
    pub fn purge_expired_exclusions(&self) -> Result<usize, EngineError> {
        let now = self.collaborators.clock.now();
        Ok(self.collaborators.history.purge_expired_exclusions(now)?)
    }

    /// Read-modify-write the profile with bounded optimistic retries.
    ///
    /// `change` returns whether it altered the profile; an unchanged
    /// profile is returned without writing.
    fn update_profile<F>(&self, user_id: &str, change: F) -> Result<TasteProfile, EngineError>
    where
        F: Fn(&mut TasteProfile) -> bool,
    {
        let profiles = &self.collaborators.profiles;
        let attempts = self.config.profile_update_retries;
        for attempt in 1..=attempts {
            let mut profile = profiles
                .get(user_id)
                .map_err(|error| profile_failure(user_id, error, attempt))?
                .unwrap_or_else(|| TasteProfile::neutral(user_id));
            if !change(&mut profile) {
                return Ok(profile);
            }
            match profiles.update(user_id, profile.version, profile.interests) {
                Ok(updated) => return Ok(updated),
                Err(ProfileStoreError::Conflict { expected, actual }) => {
                    log::debug!(
                        "profile of {user_id} moved from {expected} to {actual}; attempt {attempt} of {attempts}"
                    );
                }
                Err(ProfileStoreError::Store(error)) => return Err(error.into()),
            }
        }
        log::warn!("giving up on the profile of {user_id} after {attempts} conflicting updates");
        Err(EngineError::ConcurrencyConflict {
            user_id: user_id.to_owned(),
            attempts,
        })
    }
}

pub(crate) fn profile_failure(user_id: &str, error: ProfileStoreError, attempts: u32) -> EngineError {
    match error {
        ProfileStoreError::Conflict { .. } => EngineError::ConcurrencyConflict {
            user_id: user_id.to_owned(),
            attempts,
        },
        ProfileStoreError::Store(error) => EngineError::Store(error),
    }
}

fn require_user(user_id: &str) -> Result<(), EngineError> {
    if user_id.trim().is_empty() {
        return Err(EngineError::InvalidInput(vec![ValidationError::BlankUserId]));
    }
    Ok(())
}
