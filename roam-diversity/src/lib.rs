//! Diversity-aware selection of ranked candidates.
//!
//! The scorer produces a relevance-ordered list; the functions here pick the
//! final `count` items while trading relevance for variety:
//! - [`epsilon_greedy`] mostly exploits, sometimes explores uniformly;
//! - [`softmax`] samples by temperature-scaled score;
//! - [`mmr`] penalises items similar to those already picked;
//! - [`thompson`] samples Beta posteriors built from score and feedback.
//!
//! Every randomised strategy takes its random source as a parameter. A
//! seeded `rand_chacha::ChaCha8Rng` makes selections reproducible.
//! Non-finite scores are treated as zero.

#![forbid(unsafe_code)]

mod epsilon;
mod error;
mod mmr;
mod ranking;
mod softmax;
mod strategy;
mod thompson;

pub use epsilon::epsilon_greedy;
pub use error::DiversityError;
pub use mmr::mmr;
pub use softmax::softmax;
pub use strategy::{DiversityConfig, DiversityStrategy};
pub use thompson::{Arm, thompson};
