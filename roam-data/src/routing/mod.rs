//! HTTP travel-cost provider backed by an OSRM routing service.
//!
//! [`HttpTravelCostProvider`] implements the synchronous
//! [`roam_core::TravelCostProvider`] trait by blocking on requests to the
//! OSRM Table API, asking for both distance and duration annotations.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use geo::Coord;
//! use roam_core::{TravelCostProvider, TravelMode};
//! use roam_data::routing::{HttpTravelCostProvider, HttpTravelCostProviderConfig};
//!
//! let config = HttpTravelCostProviderConfig::new("http://localhost:5000")
//!     .with_timeout(Duration::from_secs(10))
//!     .with_user_agent("my-app/1.0");
//! let provider = HttpTravelCostProvider::with_config(config)?;
//!
//! let points = [Coord { x: -0.1, y: 51.5 }, Coord { x: -0.2, y: 51.6 }];
//! let matrix = provider.cost_matrix(&points, TravelMode::Walking)?;
//! assert_eq!(matrix.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod osrm;
mod provider;

pub use provider::{
    DEFAULT_USER_AGENT, HttpTravelCostProvider, HttpTravelCostProviderConfig, ProviderBuildError,
};
