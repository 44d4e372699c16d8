//! Route types shared by optimizers and the orchestrator.

use std::time::Duration;

use geo::Coord;
use thiserror::Error;

/// How the user intends to travel between stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum TravelMode {
    /// On foot.
    #[default]
    Walking,
    /// By car.
    Driving,
}

impl TravelMode {
    /// Return the mode as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Walking => "walking",
            Self::Driving => "driving",
        }
    }
}

/// A stop the route must visit.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use roam_core::Waypoint;
///
/// let stop = Waypoint::new("museum", Coord { x: 2.35, y: 48.86 }).mandatory();
/// assert!(stop.mandatory);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    /// Identifier, usually the place id.
    pub id: String,
    /// Geospatial position.
    pub location: Coord<f64>,
    /// Whether the stop must appear in the output.
    #[cfg_attr(feature = "serde", serde(default))]
    pub mandatory: bool,
    /// Optional display name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
}

impl Waypoint {
    /// Construct an optional, unnamed waypoint.
    pub fn new(id: impl Into<String>, location: Coord<f64>) -> Self {
        Self {
            id: id.into(),
            location,
            mandatory: false,
            name: None,
        }
    }

    /// Mark the waypoint as mandatory.
    #[must_use]
    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    /// Attach a display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// The strategy that produced an [`OptimizedRoute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum OptimizationMethod {
    /// Provably minimal ordering.
    Exact,
    /// Nearest-neighbour construction, possibly polished by 2-opt.
    NearestNeighbor,
    /// Input order, kept when optimization failed.
    Unoptimized,
}

impl OptimizationMethod {
    /// Return the stable label of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::NearestNeighbor => "nearest-neighbor",
            Self::Unoptimized => "unoptimized",
        }
    }
}

impl std::fmt::Display for OptimizationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One hop between consecutive stops. The first leg starts at the origin.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteLeg {
    /// Identifier of the departure point; `"origin"` for the first leg.
    pub from: String,
    /// Identifier of the arrival waypoint.
    pub to: String,
    /// Leg distance in metres.
    pub distance_m: f64,
    /// Leg travel time.
    pub duration: Duration,
}

/// An ordered visit plan starting at a fixed origin with an open end.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizedRoute {
    /// Starting point, not part of `waypoints`.
    pub origin: Coord<f64>,
    /// Waypoints in visiting order.
    pub waypoints: Vec<Waypoint>,
    /// Legs between consecutive stops.
    pub legs: Vec<RouteLeg>,
    /// Sum of leg distances in metres.
    pub total_distance_m: f64,
    /// Sum of leg durations.
    pub total_duration: Duration,
    /// Strategy that produced the order.
    pub method: OptimizationMethod,
    /// Fractional saving against the input order, in `0.0..=1.0`.
    pub improvement: f64,
    /// Distance of the input order in metres.
    pub naive_distance_m: f64,
}

impl OptimizedRoute {
    /// Return the waypoint identifiers in visiting order.
    #[must_use]
    pub fn waypoint_ids(&self) -> Vec<String> {
        self.waypoints.iter().map(|waypoint| waypoint.id.clone()).collect()
    }
}

/// Errors raised by route optimizers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// No waypoints were supplied.
    #[error("at least one waypoint is required")]
    NoWaypoints,
    /// The cost matrix did not match the number of points.
    #[error("cost matrix has {actual} rows, expected {expected}")]
    MatrixShape {
        /// Number of points including the origin.
        expected: usize,
        /// Number of rows received.
        actual: usize,
    },
    /// A solver could not produce an ordering.
    #[error("solver failed: {message}")]
    SolverFailed {
        /// Human-readable failure description.
        message: String,
    },
}
