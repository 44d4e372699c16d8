//! Suggest command implementation for the Roam CLI.

use std::io::Write;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use roam_core::{
    HaversineTravelCost, MemoryHistoryStore, MemoryTasteProfileStore, SqliteUserStore,
    SuggestionRequest, TravelCostProvider,
};
use roam_data::{HttpTravelCostProvider, JsonPlaceCatalogue};
use roam_orchestrator::{
    CancellationToken, Collaborators, EngineConfig, Orchestrator, SuggestionResponse,
};
use serde::{Deserialize, Serialize};

use crate::input::{load_json, require_existing, write_json};
use crate::{
    ARG_CATALOGUE, ARG_DATABASE, ARG_ENGINE_CONFIG, ARG_OSRM_BASE_URL, ARG_SUGGEST_REQUEST,
    CliError, ENV_CATALOGUE, ENV_SUGGEST_REQUEST,
};

/// CLI arguments for the `suggest` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Answer a JSON-encoded SuggestionRequest using a JSON place \
                 catalogue. User history and taste profiles persist in a \
                 SQLite database when one is given and live in memory \
                 otherwise. Routes use OSRM when a base URL is configured \
                 and straight-line estimates otherwise.",
    about = "Suggest places around a location"
)]
#[ortho_config(prefix = "ROAM")]
pub(crate) struct SuggestArgs {
    /// Path to a JSON file containing a SuggestionRequest.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Path to the JSON place catalogue.
    #[arg(long = ARG_CATALOGUE, value_name = "path")]
    #[serde(default)]
    pub(crate) catalogue: Option<Utf8PathBuf>,
    /// Path to the SQLite user store; created when missing.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Path to a JSON engine configuration.
    #[arg(long = ARG_ENGINE_CONFIG, value_name = "path")]
    #[serde(default)]
    pub(crate) engine_config: Option<Utf8PathBuf>,
    /// Base URL for the OSRM server (e.g. "http://localhost:5000").
    #[arg(long = ARG_OSRM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base_url: Option<String>,
}

impl SuggestArgs {
    pub(crate) fn into_config(self) -> Result<SuggestConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SuggestConfig::try_from(merged)
    }
}

/// Resolved `suggest` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SuggestConfig {
    pub(crate) request_path: Utf8PathBuf,
    pub(crate) catalogue: Utf8PathBuf,
    pub(crate) database: Option<Utf8PathBuf>,
    pub(crate) engine_config: Option<Utf8PathBuf>,
    pub(crate) osrm_base_url: Option<String>,
}

impl SuggestConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.request_path, ARG_SUGGEST_REQUEST)?;
        require_existing(&self.catalogue, ARG_CATALOGUE)?;
        if let Some(path) = &self.engine_config {
            require_existing(path, ARG_ENGINE_CONFIG)?;
        }
        Ok(())
    }

    fn engine_config(&self) -> Result<EngineConfig, CliError> {
        self.engine_config
            .as_deref()
            .map_or_else(|| Ok(EngineConfig::default()), |path| load_json(path, "engine config"))
    }
}

impl TryFrom<SuggestArgs> for SuggestConfig {
    type Error = CliError;

    fn try_from(args: SuggestArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_SUGGEST_REQUEST,
            env: ENV_SUGGEST_REQUEST,
        })?;
        let catalogue = args.catalogue.ok_or(CliError::MissingArgument {
            field: ARG_CATALOGUE,
            env: ENV_CATALOGUE,
        })?;
        Ok(Self {
            request_path,
            catalogue,
            database: args.database,
            engine_config: args.engine_config,
            osrm_base_url: args.osrm_base_url.filter(|url| !url.trim().is_empty()),
        })
    }
}

/// Wires the engine's collaborators for one `suggest` invocation.
pub(crate) trait CollaboratorsBuilder {
    fn build(&self, config: &SuggestConfig) -> Result<Collaborators, CliError>;
}

pub(crate) struct DefaultCollaboratorsBuilder;

impl CollaboratorsBuilder for DefaultCollaboratorsBuilder {
    fn build(&self, config: &SuggestConfig) -> Result<Collaborators, CliError> {
        let catalogue = Arc::new(JsonPlaceCatalogue::from_path(&config.catalogue)?);
        log::debug!("catalogue holds {} places", catalogue.len());
        let collaborators = if let Some(path) = &config.database {
            let store = Arc::new(SqliteUserStore::open(path.as_std_path())?);
            Collaborators::new(Arc::<SqliteUserStore>::clone(&store), store, catalogue)
        } else {
            Collaborators::new(
                Arc::new(MemoryHistoryStore::default()),
                Arc::new(MemoryTasteProfileStore::default()),
                catalogue,
            )
        };
        let travel_cost = travel_cost_provider(config.osrm_base_url.as_deref())?;
        Ok(collaborators.with_travel_cost(travel_cost))
    }
}

/// OSRM when `base_url` is set, haversine estimates otherwise.
pub(crate) fn travel_cost_provider(
    base_url: Option<&str>,
) -> Result<Arc<dyn TravelCostProvider>, CliError> {
    let Some(base_url) = base_url else {
        return Ok(Arc::new(HaversineTravelCost));
    };
    let provider =
        HttpTravelCostProvider::new(base_url).map_err(|source| CliError::BuildTravelCostProvider {
            base_url: base_url.to_owned(),
            source,
        })?;
    Ok(Arc::new(provider))
}

pub(crate) fn run_suggest(args: SuggestArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_suggest_with(args, &DefaultCollaboratorsBuilder, &mut stdout)
}

pub(crate) fn run_suggest_with(
    args: SuggestArgs,
    builder: &dyn CollaboratorsBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let response = execute_suggest(args, builder)?;
    write_json(writer, &response)
}

fn execute_suggest(
    args: SuggestArgs,
    builder: &dyn CollaboratorsBuilder,
) -> Result<SuggestionResponse, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let request: SuggestionRequest = load_json(&config.request_path, "suggestion request")?;
    let engine =
        Orchestrator::new(config.engine_config()?, builder.build(&config)?)
            .map_err(CliError::StartEngine)?;
    engine
        .suggest(&request, &CancellationToken::new())
        .map_err(CliError::Suggest)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SuggestConfig, CliError> {
    let merged = SuggestArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SuggestConfig::try_from(merged)
}
