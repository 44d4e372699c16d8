//! Deterministic collaborators used by unit and behaviour tests across the
//! workspace.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use geo::Coord;

use crate::{
    Clock, ContextInsights, ContextInsightsProvider, Place, PlaceQuery, PlaceSearch, SearchError,
    TravelCost, TravelCostError, TravelCostMatrix, TravelCostProvider, TravelMode, haversine_m,
};

/// [`Clock`] returning a fixed instant that tests can advance.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Create a clock frozen at `now`.
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Create a clock frozen at 2023-11-14T22:13:20Z.
    #[must_use]
    pub fn epoch() -> Self {
        Self::new(DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default())
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: TimeDelta) {
        if let Ok(mut now) = self.now.lock() {
            *now += delta;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.lock().map_or_else(|_| Utc::now(), |now| *now)
    }
}

/// Deterministic [`TravelCostProvider`] returning one-second, one-metre edges.
#[derive(Default, Debug, Copy, Clone)]
pub struct UnitTravelCostProvider;

impl TravelCostProvider for UnitTravelCostProvider {
    fn cost_matrix(
        &self,
        points: &[Coord<f64>],
        _mode: TravelMode,
    ) -> Result<TravelCostMatrix, TravelCostError> {
        if points.is_empty() {
            return Err(TravelCostError::EmptyInput);
        }
        let n = points.len();
        let edge = TravelCost {
            distance_m: 1.0,
            duration: Duration::from_secs(1),
        };
        let mut matrix = vec![vec![edge; n]; n];
        for (i, row) in matrix.iter_mut().enumerate() {
            if let Some(cell) = row.get_mut(i) {
                *cell = TravelCost::ZERO;
            }
        }
        Ok(matrix)
    }
}

/// [`TravelCostProvider`] that always reports the routing service as down.
#[derive(Default, Debug, Copy, Clone)]
pub struct FailingTravelCostProvider;

impl TravelCostProvider for FailingTravelCostProvider {
    fn cost_matrix(
        &self,
        _points: &[Coord<f64>],
        _mode: TravelMode,
    ) -> Result<TravelCostMatrix, TravelCostError> {
        Err(TravelCostError::Unavailable {
            message: "routing service offline".into(),
        })
    }
}

/// [`PlaceSearch`] serving a fixed list filtered by haversine radius.
#[derive(Debug, Default)]
pub struct StaticPlaceSearch {
    places: Vec<Place>,
    calls: AtomicUsize,
}

impl StaticPlaceSearch {
    /// Create a catalogue from a collection of places.
    pub fn with_places<I>(places: I) -> Self
    where
        I: IntoIterator<Item = Place>,
    {
        Self {
            places: places.into_iter().collect(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of searches served so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PlaceSearch for StaticPlaceSearch {
    fn search(&self, query: &PlaceQuery) -> Result<Vec<Place>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let centre = Coord {
            x: query.longitude,
            y: query.latitude,
        };
        Ok(self
            .places
            .iter()
            .filter(|place| haversine_m(centre, place.location) <= query.radius_m)
            .take(query.limit)
            .cloned()
            .collect())
    }
}

/// [`PlaceSearch`] that always fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingPlaceSearch;

impl PlaceSearch for FailingPlaceSearch {
    fn search(&self, _query: &PlaceQuery) -> Result<Vec<Place>, SearchError> {
        Err(SearchError::Unavailable {
            message: "catalogue offline".into(),
        })
    }
}

/// [`ContextInsightsProvider`] returning fixed insights, or failing when
/// constructed with `None`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticInsights(pub Option<ContextInsights>);

impl ContextInsightsProvider for StaticInsights {
    fn insights(&self, _latitude: f64, _longitude: f64) -> Result<ContextInsights, SearchError> {
        self.0.ok_or_else(|| SearchError::Unavailable {
            message: "no insights".into(),
        })
    }
}

/// Build a place offset from `origin` by `east_m` and `north_m` metres.
///
/// Uses a flat-earth approximation that is accurate to a few centimetres
/// over the distances tests work with.
#[must_use]
pub fn place_near(
    origin: Coord<f64>,
    id: &str,
    category: &str,
    east_m: f64,
    north_m: f64,
) -> Place {
    const METRES_PER_DEGREE: f64 = 111_195.08;
    let lat_scale = origin.y.to_radians().cos().max(1e-6);
    let location = Coord {
        x: origin.x + east_m / (METRES_PER_DEGREE * lat_scale),
        y: origin.y + north_m / METRES_PER_DEGREE,
    };
    Place::new(id, id, category, location)
}
