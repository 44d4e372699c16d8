//! Route sequencing for Roam.
//!
//! [`RouteOptimizer`] orders the places a user chose into an open walk that
//! starts at their position. Up to [`RouteOptimizerConfig::exact_limit`]
//! points the order is provably shortest: small instances are enumerated,
//! larger ones go through a Held–Karp dynamic programme. Beyond that a
//! nearest-neighbour tour is polished with 2-opt moves.
//!
//! Pairwise costs come from any
//! [`TravelCostProvider`](roam_core::TravelCostProvider). When the provider
//! fails the optimizer logs the failure and falls back to haversine costs,
//! and a solver stage that fails hands over to the next one. The result
//! never covers more distance than the order the waypoints arrived in.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod exact;
mod heuristic;
mod matrix;
mod optimizer;

pub use optimizer::{ORIGIN_ID, RouteOptimizer, RouteOptimizerConfig};
