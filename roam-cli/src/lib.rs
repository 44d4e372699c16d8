//! Command-line interface for the Roam suggestion engine.
//!
//! `roam suggest` answers a JSON suggestion request against a JSON place
//! catalogue. `roam route` orders a JSON list of waypoints. Both print JSON
//! to stdout. Paths and the OSRM base URL are layered from CLI flags,
//! `ROAM_*` environment variables and configuration files.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod input;
mod route;
mod suggest;

pub use error::CliError;

pub(crate) const ARG_SUGGEST_REQUEST: &str = "request";
pub(crate) const ARG_CATALOGUE: &str = "catalogue";
pub(crate) const ARG_DATABASE: &str = "database";
pub(crate) const ARG_ENGINE_CONFIG: &str = "engine-config";
pub(crate) const ARG_OSRM_BASE_URL: &str = "osrm-base-url";
pub(crate) const ARG_ROUTE_REQUEST: &str = "request";
pub(crate) const ENV_SUGGEST_REQUEST: &str = "ROAM_CMDS_SUGGEST_REQUEST_PATH";
pub(crate) const ENV_CATALOGUE: &str = "ROAM_CMDS_SUGGEST_CATALOGUE";
pub(crate) const ENV_ROUTE_REQUEST: &str = "ROAM_CMDS_ROUTE_REQUEST_PATH";

/// Run the Roam CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments or configuration are invalid, an
/// input cannot be read, the engine fails or the output cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Suggest(args) => suggest::run_suggest(args),
        Command::Route(args) => route::run_route(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "roam",
    about = "Personalised place suggestions and walking routes",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Suggest places for a user around a location.
    Suggest(suggest::SuggestArgs),
    /// Order waypoints into a short route.
    Route(route::RouteArgs),
}

#[cfg(test)]
mod tests;
