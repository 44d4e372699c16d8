//! Narrow interfaces to collaborators the engine consumes but does not own.
//!
//! Catalogue search and context insights are thin I/O wrappers supplied by
//! the embedding application. Their failures never abort a request: the
//! orchestrator logs them and degrades to zero candidates or neutral context.

use thiserror::Error;

use crate::Place;

/// Parameters of a catalogue lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceQuery {
    /// Latitude of the search centre in degrees.
    pub latitude: f64,
    /// Longitude of the search centre in degrees.
    pub longitude: f64,
    /// Search radius in metres.
    pub radius_m: f64,
    /// Optional category narrowing the search.
    pub category_hint: Option<String>,
    /// Upper bound on returned places.
    pub limit: usize,
}

/// Failure reported by an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The collaborator could not be reached.
    #[error("upstream unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },
    /// The collaborator answered with data the engine cannot use.
    #[error("invalid upstream response: {message}")]
    InvalidResponse {
        /// Description of the failure.
        message: String,
    },
}

/// Catalogue lookup of candidate places.
pub trait PlaceSearch: Send + Sync {
    /// Return places around the query centre.
    fn search(&self, query: &PlaceQuery) -> Result<Vec<Place>, SearchError>;
}

/// Coarse part of the day at the user's location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum TimeOfDay {
    /// Roughly 05:00 to 11:00.
    Morning,
    /// Roughly 11:00 to 14:00.
    Midday,
    /// Roughly 14:00 to 18:00.
    Afternoon,
    /// Roughly 18:00 to 22:00.
    Evening,
    /// Late night.
    Night,
}

/// Current weather at the user's location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Weather {
    /// Clear and dry.
    Clear,
    /// Overcast but dry.
    Cloudy,
    /// Rain or drizzle.
    Rain,
    /// Snowfall.
    Snow,
    /// Unusually hot.
    Hot,
}

/// Meteorological season at the user's location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Season {
    /// Spring.
    Spring,
    /// Summer.
    Summer,
    /// Autumn.
    Autumn,
    /// Winter.
    Winter,
}

/// Situational signals feeding the context-fit score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContextInsights {
    /// Part of the day.
    pub time_of_day: TimeOfDay,
    /// Current weather.
    pub weather: Weather,
    /// Current season.
    pub season: Season,
}

/// Provider of situational insights for a location.
pub trait ContextInsightsProvider: Send + Sync {
    /// Return insights for the given coordinates.
    fn insights(&self, latitude: f64, longitude: f64) -> Result<ContextInsights, SearchError>;
}
