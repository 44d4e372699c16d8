//! Route command implementation for the Roam CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use geo::Coord;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use roam_core::{OptimizedRoute, TravelMode, Waypoint};
use roam_solver_tsp::RouteOptimizer;
use serde::{Deserialize, Serialize};

use crate::input::{load_json, require_existing, write_json};
use crate::suggest::travel_cost_provider;
use crate::{ARG_OSRM_BASE_URL, ARG_ROUTE_REQUEST, CliError, ENV_ROUTE_REQUEST};

/// CLI arguments for the `route` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Order the waypoints of a JSON route request into an \
                 open path from the origin. Costs come from OSRM when a base \
                 URL is configured and from straight-line estimates otherwise.",
    about = "Order waypoints into a short route"
)]
#[ortho_config(prefix = "ROAM")]
pub(crate) struct RouteArgs {
    /// Path to a JSON file containing a route request.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Base URL for the OSRM server (e.g. "http://localhost:5000").
    #[arg(long = ARG_OSRM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base_url: Option<String>,
}

/// Waypoints to order and where the walk starts.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct RouteRequest {
    pub(crate) origin: Coord<f64>,
    pub(crate) waypoints: Vec<Waypoint>,
    #[serde(default)]
    pub(crate) travel_mode: TravelMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RouteConfig {
    pub(crate) request_path: Utf8PathBuf,
    pub(crate) osrm_base_url: Option<String>,
}

impl TryFrom<RouteArgs> for RouteConfig {
    type Error = CliError;

    fn try_from(args: RouteArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_ROUTE_REQUEST,
            env: ENV_ROUTE_REQUEST,
        })?;
        Ok(Self {
            request_path,
            osrm_base_url: args.osrm_base_url.filter(|url| !url.trim().is_empty()),
        })
    }
}

pub(crate) fn run_route(args: RouteArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_route_with(args, &mut stdout)
}

pub(crate) fn run_route_with(args: RouteArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let route = execute_route(args)?;
    write_json(writer, &route)
}

fn execute_route(args: RouteArgs) -> Result<OptimizedRoute, CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = RouteConfig::try_from(merged)?;
    require_existing(&config.request_path, ARG_ROUTE_REQUEST)?;
    let request: RouteRequest = load_json(&config.request_path, "route request")?;
    let optimizer = RouteOptimizer::new(travel_cost_provider(config.osrm_base_url.as_deref())?);
    let route = optimizer.optimize(request.origin, &request.waypoints, request.travel_mode)?;
    log::debug!(
        "ordered {} waypoints with {} ({:.0} m)",
        route.waypoints.len(),
        route.method,
        route.total_distance_m
    );
    Ok(route)
}
