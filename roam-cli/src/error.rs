//! Error types emitted by the Roam CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use roam_core::{RouteError, StoreError};
use roam_data::{CatalogueError, ProviderBuildError};
use roam_orchestrator::EngineError;
use thiserror::Error;

/// Errors emitted by the Roam CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// A referenced input path does not exist.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag naming the input.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag naming the input.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag naming the input.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
    /// Opening a JSON input failed.
    #[error("failed to open {what} at {path:?}: {source}")]
    OpenInput {
        /// Kind of input.
        what: &'static str,
        /// Input path.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
    /// A JSON input could not be decoded.
    #[error("failed to parse {what} JSON at {path:?}: {source}")]
    ParseInput {
        /// Kind of input.
        what: &'static str,
        /// Input path.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: serde_json::Error,
    },
    /// Loading the place catalogue failed.
    #[error(transparent)]
    LoadCatalogue(#[from] CatalogueError),
    /// Opening the user store failed.
    #[error(transparent)]
    OpenStore(#[from] StoreError),
    /// Constructing the travel-cost provider failed.
    #[error("failed to build travel cost provider for {base_url:?}: {source}")]
    BuildTravelCostProvider {
        /// Configured OSRM base URL.
        base_url: String,
        /// Underlying failure.
        #[source]
        source: ProviderBuildError,
    },
    /// The engine rejected its configuration.
    #[error("failed to start the suggestion engine: {0}")]
    StartEngine(#[source] EngineError),
    /// The engine could not answer the request.
    #[error("suggestion failed: {0}")]
    Suggest(#[source] EngineError),
    /// No route could be built.
    #[error("route optimisation failed: {0}")]
    Route(#[from] RouteError),
    /// Serialising the response failed.
    #[error("failed to serialise response: {0}")]
    SerialiseResponse(#[source] serde_json::Error),
    /// Writing the output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
