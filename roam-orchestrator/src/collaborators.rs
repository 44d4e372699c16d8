//! The stores and services an [`Orchestrator`](crate::Orchestrator) talks to.

use std::sync::Arc;

use roam_core::{
    Clock, ContextInsightsProvider, HaversineTravelCost, HistoryStore, PlaceSearch, SystemClock,
    TasteProfileStore, TravelCostProvider,
};

/// Shared handles to everything outside the engine.
///
/// Only the stores and the catalogue are mandatory. Insights default to
/// absent, travel costs to haversine and time to the system clock.
#[derive(Clone)]
pub struct Collaborators {
    /// Favourites, exclusions, history and feedback.
    pub history: Arc<dyn HistoryStore>,
    /// Versioned taste profiles.
    pub profiles: Arc<dyn TasteProfileStore>,
    /// Catalogue search.
    pub search: Arc<dyn PlaceSearch>,
    /// Situational insights, when available.
    pub insights: Option<Arc<dyn ContextInsightsProvider>>,
    /// Pairwise travel costs for routes.
    pub travel_cost: Arc<dyn TravelCostProvider>,
    /// Source of "now".
    pub clock: Arc<dyn Clock>,
}

impl Collaborators {
    /// Wire the mandatory collaborators, defaulting the rest.
    #[must_use]
    pub fn new(
        history: Arc<dyn HistoryStore>,
        profiles: Arc<dyn TasteProfileStore>,
        search: Arc<dyn PlaceSearch>,
    ) -> Self {
        Self {
            history,
            profiles,
            search,
            insights: None,
            travel_cost: Arc::new(HaversineTravelCost),
            clock: Arc::new(SystemClock),
        }
    }

    /// Attach an insights provider.
    #[must_use]
    pub fn with_insights(mut self, insights: Arc<dyn ContextInsightsProvider>) -> Self {
        self.insights = Some(insights);
        self
    }

    /// Replace the travel-cost provider.
    #[must_use]
    pub fn with_travel_cost(mut self, travel_cost: Arc<dyn TravelCostProvider>) -> Self {
        self.travel_cost = travel_cost;
        self
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("insights", &self.insights.is_some())
            .finish_non_exhaustive()
    }
}
