//! What a suggestion request returns.

use std::time::Duration;

use roam_core::{OptimizedRoute, ScoredCandidate};
use roam_diversity::DiversityStrategy;

/// Counters describing how a request was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostics {
    /// Places returned by the catalogue search.
    pub candidates_found: usize,
    /// Places removed by the intent filter, exclusions and the walking radius.
    pub candidates_filtered: usize,
    /// Places that went through the hybrid scorer.
    pub candidates_scored: usize,
    /// Whether situational insights were available.
    pub context_available: bool,
    /// Wall-clock time spent on the request.
    pub elapsed: Duration,
}

/// Ranked, explained suggestions and the optional route through them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SuggestionResponse {
    /// Selected places in selection order.
    pub suggestions: Vec<ScoredCandidate>,
    /// Visiting order for route-planning requests.
    pub route: Option<OptimizedRoute>,
    /// Strategy that picked the suggestions.
    pub strategy: DiversityStrategy,
    /// How the request was served.
    pub diagnostics: Diagnostics,
}

impl SuggestionResponse {
    /// Identifiers of the suggested places in order.
    #[must_use]
    pub fn place_ids(&self) -> Vec<&str> {
        self.suggestions
            .iter()
            .map(|candidate| candidate.place.id.as_str())
            .collect()
    }
}
