//! Suggestion requests and their validation errors.

use thiserror::Error;

use crate::{DiversityLevel, Intent, TravelMode};

/// A request for place suggestions around a location.
///
/// # Examples
/// ```
/// use roam_core::{Intent, SuggestionRequest};
///
/// let request = SuggestionRequest::new("u1", 48.85, 2.35, 2_000.0, Intent::RoutePlanning)
///     .with_walking_distance(3_000.0)
///     .with_seed(7);
/// assert_eq!(request.max_walking_distance_m, Some(3_000.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SuggestionRequest {
    /// Requesting user.
    pub user_id: String,
    /// Latitude of the origin in degrees.
    pub latitude: f64,
    /// Longitude of the origin in degrees.
    pub longitude: f64,
    /// Search radius in metres.
    pub radius_m: f64,
    /// What the user wants.
    pub intent: Intent,
    /// Requested result count, capped by the intent policy.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_results: Option<usize>,
    /// Walking budget; required for route planning.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_walking_distance_m: Option<f64>,
    /// Category narrowing the catalogue search.
    #[cfg_attr(feature = "serde", serde(default))]
    pub category_hint: Option<String>,
    /// Travel mode for routes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub travel_mode: TravelMode,
    /// Override of the intent's default diversity level.
    #[cfg_attr(feature = "serde", serde(default))]
    pub diversity: Option<DiversityLevel>,
    /// Seed for randomised selection; random when absent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub seed: Option<u64>,
}

impl SuggestionRequest {
    /// Construct a request with every optional field unset.
    pub fn new(
        user_id: impl Into<String>,
        latitude: f64,
        longitude: f64,
        radius_m: f64,
        intent: Intent,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            latitude,
            longitude,
            radius_m,
            intent,
            max_results: None,
            max_walking_distance_m: None,
            category_hint: None,
            travel_mode: TravelMode::default(),
            diversity: None,
            seed: None,
        }
    }

    /// Set the requested result count.
    #[must_use]
    pub fn with_max_results(mut self, count: usize) -> Self {
        self.max_results = Some(count);
        self
    }

    /// Set the walking budget in metres.
    #[must_use]
    pub fn with_walking_distance(mut self, metres: f64) -> Self {
        self.max_walking_distance_m = Some(metres);
        self
    }

    /// Set the category hint.
    #[must_use]
    pub fn with_category_hint(mut self, hint: impl Into<String>) -> Self {
        self.category_hint = Some(hint.into());
        self
    }

    /// Override the diversity level.
    #[must_use]
    pub fn with_diversity(mut self, level: DiversityLevel) -> Self {
        self.diversity = Some(level);
        self
    }

    /// Fix the selection seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// A problem with a [`SuggestionRequest`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The user id was empty or whitespace.
    #[error("user id must not be blank")]
    BlankUserId,
    /// Latitude outside `-90..=90` or not finite.
    #[error("latitude {value} is outside -90..=90")]
    InvalidLatitude {
        /// Offending value.
        value: f64,
    },
    /// Longitude outside `-180..=180` or not finite.
    #[error("longitude {value} is outside -180..=180")]
    InvalidLongitude {
        /// Offending value.
        value: f64,
    },
    /// Radius not strictly positive.
    #[error("radius must be positive, got {value}")]
    InvalidRadius {
        /// Offending value.
        value: f64,
    },
    /// Route planning without a walking budget.
    #[error("route planning requires max_walking_distance_m")]
    MissingWalkingDistance,
    /// Walking budget not strictly positive.
    #[error("walking distance must be positive, got {value}")]
    InvalidWalkingDistance {
        /// Offending value.
        value: f64,
    },
    /// A result count of zero was requested.
    #[error("max_results must be at least 1")]
    InvalidMaxResults,
}
