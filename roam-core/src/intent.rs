//! Per-intent policy table and the pure request checks built on it.
//!
//! Each [`Intent`] resolves to an immutable [`IntentPolicy`]: which categories
//! are allowed, how many results to return, whether a route must be built and
//! how much diversity the selection should apply. Only the result counts are
//! configurable, through [`IntentLimits`].
//!
//! # Examples
//! ```
//! use roam_core::{DiversityLevel, Intent, IntentLimits};
//!
//! let policy = Intent::QuickSuggestion.policy(&IntentLimits::default());
//! assert_eq!(policy.max_results, 3);
//! assert!(!policy.route_required);
//! assert_eq!(policy.diversity, DiversityLevel::Low);
//! ```

use std::collections::HashSet;

use crate::{Place, SuggestionRequest, ValidationError, category};

/// What the user wants from a suggestion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum Intent {
    /// A handful of good options, any category.
    QuickSuggestion,
    /// Somewhere to eat or drink coffee.
    FoodOnly,
    /// Something to do that is not eating.
    ActivityOnly,
    /// Several stops ordered into a route.
    RoutePlanning,
    /// Deliberately unfamiliar options.
    TrySomethingNew,
}

impl Intent {
    /// Every intent in declaration order.
    pub const ALL: [Self; 5] = [
        Self::QuickSuggestion,
        Self::FoodOnly,
        Self::ActivityOnly,
        Self::RoutePlanning,
        Self::TrySomethingNew,
    ];

    /// Return the stable wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::QuickSuggestion => "QUICK_SUGGESTION",
            Self::FoodOnly => "FOOD_ONLY",
            Self::ActivityOnly => "ACTIVITY_ONLY",
            Self::RoutePlanning => "ROUTE_PLANNING",
            Self::TrySomethingNew => "TRY_SOMETHING_NEW",
        }
    }

    /// Resolve the policy for this intent under `limits`.
    #[must_use]
    pub fn policy(self, limits: &IntentLimits) -> IntentPolicy {
        match self {
            Self::QuickSuggestion => IntentPolicy {
                categories: CategoryRule::Any,
                max_results: QUICK_SUGGESTION_RESULTS,
                route_required: false,
                diversity: DiversityLevel::Low,
                novelty_emphasis: 0.0,
            },
            Self::FoodOnly => IntentPolicy {
                categories: CategoryRule::FoodOnly,
                max_results: limits.food_only,
                route_required: false,
                diversity: DiversityLevel::Low,
                novelty_emphasis: 0.0,
            },
            Self::ActivityOnly => IntentPolicy {
                categories: CategoryRule::NonFood,
                max_results: limits.activity_only,
                route_required: false,
                diversity: DiversityLevel::Medium,
                novelty_emphasis: 0.0,
            },
            Self::RoutePlanning => IntentPolicy {
                categories: CategoryRule::Any,
                max_results: limits.route_planning,
                route_required: true,
                diversity: DiversityLevel::Medium,
                novelty_emphasis: 0.0,
            },
            Self::TrySomethingNew => IntentPolicy {
                categories: CategoryRule::Any,
                max_results: limits.try_something_new,
                route_required: false,
                diversity: DiversityLevel::High,
                novelty_emphasis: limits.novelty_emphasis,
            },
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How strongly the selection should trade score for variety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum DiversityLevel {
    /// Near-greedy.
    #[default]
    Low,
    /// Balance relevance against redundancy.
    Medium,
    /// Explore aggressively.
    High,
}

/// Category allow-list applied by [`apply_intent_filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryRule {
    /// Every category passes.
    Any,
    /// Only the food allow-list passes.
    FoodOnly,
    /// Everything except the food allow-list passes.
    NonFood,
}

impl CategoryRule {
    /// Report whether `category` passes the rule.
    #[must_use]
    pub fn allows(self, category: &str) -> bool {
        match self {
            Self::Any => true,
            Self::FoodOnly => category::is_food_category(category),
            Self::NonFood => !category::is_food_category(category),
        }
    }
}

/// Number of results returned for [`Intent::QuickSuggestion`].
pub const QUICK_SUGGESTION_RESULTS: usize = 3;

/// Configurable result counts per intent.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct IntentLimits {
    /// Results for [`Intent::FoodOnly`].
    pub food_only: usize,
    /// Results for [`Intent::ActivityOnly`].
    pub activity_only: usize,
    /// Maximum stops for [`Intent::RoutePlanning`].
    pub route_planning: usize,
    /// Results for [`Intent::TrySomethingNew`].
    pub try_something_new: usize,
    /// Weight moved to novelty for [`Intent::TrySomethingNew`].
    pub novelty_emphasis: f64,
}

impl Default for IntentLimits {
    fn default() -> Self {
        Self {
            food_only: 5,
            activity_only: 5,
            route_planning: 8,
            try_something_new: 5,
            novelty_emphasis: 0.15,
        }
    }
}

/// Static rules for one intent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntentPolicy {
    /// Category allow-list.
    pub categories: CategoryRule,
    /// Upper bound on returned suggestions.
    pub max_results: usize,
    /// Whether the response must carry a route.
    pub route_required: bool,
    /// Default diversity level.
    pub diversity: DiversityLevel,
    /// Weight moved from taste terms to novelty.
    pub novelty_emphasis: f64,
}

impl IntentPolicy {
    /// Cap a requested result count by the policy.
    ///
    /// # Examples
    /// ```
    /// use roam_core::{Intent, IntentLimits};
    ///
    /// let policy = Intent::RoutePlanning.policy(&IntentLimits::default());
    /// assert_eq!(policy.result_count(Some(20)), 8);
    /// assert_eq!(policy.result_count(Some(2)), 2);
    /// assert_eq!(policy.result_count(None), 8);
    /// ```
    #[must_use]
    pub fn result_count(&self, requested: Option<usize>) -> usize {
        requested.map_or(self.max_results, |count| count.min(self.max_results))
    }
}

/// Check a request against the intent table before any I/O.
///
/// Returns every problem found; an empty list means the request is valid.
#[must_use]
pub fn validate_request(request: &SuggestionRequest) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if request.user_id.trim().is_empty() {
        errors.push(ValidationError::BlankUserId);
    }
    if !request.latitude.is_finite() || !(-90.0..=90.0).contains(&request.latitude) {
        errors.push(ValidationError::InvalidLatitude {
            value: request.latitude,
        });
    }
    if !request.longitude.is_finite() || !(-180.0..=180.0).contains(&request.longitude) {
        errors.push(ValidationError::InvalidLongitude {
            value: request.longitude,
        });
    }
    if !request.radius_m.is_finite() || request.radius_m <= 0.0 {
        errors.push(ValidationError::InvalidRadius {
            value: request.radius_m,
        });
    }
    if request.intent == Intent::RoutePlanning {
        match request.max_walking_distance_m {
            None => errors.push(ValidationError::MissingWalkingDistance),
            Some(distance) if !distance.is_finite() || distance <= 0.0 => {
                errors.push(ValidationError::InvalidWalkingDistance { value: distance });
            }
            Some(_) => {}
        }
    }
    if request.max_results == Some(0) {
        errors.push(ValidationError::InvalidMaxResults);
    }
    errors
}

/// Drop candidates outside the intent's allow-list or in `excluded_ids`.
///
/// Pure: input order is preserved for the survivors.
#[must_use]
pub fn apply_intent_filter(
    candidates: Vec<Place>,
    intent: Intent,
    excluded_ids: &HashSet<String>,
) -> Vec<Place> {
    let rule = intent.policy(&IntentLimits::default()).categories;
    candidates
        .into_iter()
        .filter(|place| rule.allows(&place.category))
        .filter(|place| !excluded_ids.contains(&place.id))
        .collect()
}
