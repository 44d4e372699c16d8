//! Adapters connecting the Roam engine to the outside world.
//!
//! Responsibilities:
//! - [`routing::HttpTravelCostProvider`] fetches walking and driving cost
//!   matrices from an OSRM Table service.
//! - [`catalogue::JsonPlaceCatalogue`] serves catalogue searches from a JSON
//!   file of places.
//!
//! Boundaries:
//! - Domain rules live in `roam-core`; this crate only moves data.
//! - Blocking trait methods bridge to async HTTP through an owned runtime.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod catalogue;
pub mod routing;

pub use catalogue::{CatalogueError, JsonPlaceCatalogue};
pub use routing::{
    DEFAULT_USER_AGENT, HttpTravelCostProvider, HttpTravelCostProviderConfig, ProviderBuildError,
};
