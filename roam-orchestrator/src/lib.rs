//! Request orchestration for Roam.
//!
//! [`Orchestrator`] ties the pieces together. A suggestion request is
//! validated, the user's history is read once, the catalogue is searched and
//! filtered by intent and exclusions, candidates are scored and explained,
//! a diversity strategy picks the final set and, for route planning, the
//! chosen places are ordered into a walk. History is written last so that a
//! cancelled or failed request leaves no trace.
//!
//! Catalogue, insight and travel-cost outages degrade the response instead
//! of failing it. Profile updates from feedback and quiz answers use
//! optimistic concurrency with a bounded number of retries.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod actions;
mod collaborators;
mod config;
mod engine;
mod error;
mod response;
mod similarity;

pub use collaborators::Collaborators;
pub use config::EngineConfig;
pub use engine::Orchestrator;
pub use error::{ConfigError, EngineError};
pub use response::{Diagnostics, SuggestionResponse};
pub use similarity::{SAME_CATEGORY, SAME_INTEREST, place_similarity};
pub use tokio_util::sync::CancellationToken;
