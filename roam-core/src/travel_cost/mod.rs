//! Compute travel costs between coordinates.
//!
//! The `TravelCostProvider` trait abstracts the retrieval of pairwise travel
//! distances and durations between points. Callers supply a slice of
//! coordinates and a [`TravelMode`](crate::TravelMode) and receive a square
//! matrix of [`TravelCost`] values.
//!
//! [`HaversineTravelCost`] is the default provider: great-circle distance
//! with a constant speed per mode.

mod error;
mod haversine;
mod provider;

pub use error::TravelCostError;
pub use haversine::{DRIVING_SPEED_KMH, HaversineTravelCost, WALKING_SPEED_KMH, haversine_m};
pub use provider::{TravelCost, TravelCostMatrix, TravelCostProvider};
