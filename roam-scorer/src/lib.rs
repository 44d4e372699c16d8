//! Scoring for Roam place suggestions.
//!
//! The crate implements the [`Scorer`](roam_core::Scorer) trait five times,
//! once per signal, and blends them in [`HybridScorer`]:
//! - [`ImplicitScorer`] reads the learned-preference log: affinity from
//!   visits and likes, decaying avoidance from dislikes, a favourite boost;
//! - [`ExplicitScorer`] matches the place's interest vector against the
//!   taste profile;
//! - [`NoveltyScorer`] rewards categories and places the user has not seen
//!   lately;
//! - [`QualityScorer`] smooths the rating by review count;
//! - [`ContextScorer`] judges fit to time of day, weather and season.
//!
//! [`HybridScorer::score_and_explain`] ranks a candidate set and attaches
//! [`ReasonCode`](roam_core::ReasonCode)s derived by [`ReasonConfig`].
//!
//! # Examples
//!
//! ```
//! use chrono::Utc;
//! use geo::Coord;
//! use roam_core::{Interest, InterestVector, Place, ScoreWeights, ScoringContext,
//!     TasteProfile, UserSnapshot};
//! use roam_scorer::HybridScorer;
//!
//! let origin = Coord { x: 13.405, y: 52.52 };
//! let mut profile = TasteProfile::neutral("u1");
//! profile.interests = InterestVector::new()
//!     .with_weight(Interest::Food, 0.9)
//!     .with_weight(Interest::Culture, 0.2);
//! let snapshot = UserSnapshot::empty("u1").with_profile(profile);
//!
//! let scorer = HybridScorer::new(ScoreWeights::default()).expect("default weights are valid");
//! let ranked = scorer.score_and_explain(
//!     &snapshot,
//!     vec![
//!         Place::new("m", "Museum", "museum", origin),
//!         Place::new("r", "Bistro", "restaurant", origin),
//!     ],
//!     &ScoringContext::new(origin, Utc::now()),
//! );
//! assert_eq!(ranked.first().map(|c| c.place.id.as_str()), Some("r"));
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod context;
mod error;
mod explicit;
mod hybrid;
mod implicit;
mod novelty;
mod quality;
mod reasons;

pub use context::ContextScorer;
pub use error::ReasonError;
pub use explicit::ExplicitScorer;
pub use hybrid::HybridScorer;
pub use implicit::{ImplicitConfig, ImplicitScorer};
pub use novelty::{NoveltyConfig, NoveltyScorer};
pub use quality::{MAX_RATING, QualityConfig, QualityScorer};
pub use reasons::{ReasonConfig, ReasonSignals};
