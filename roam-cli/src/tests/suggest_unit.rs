//! Focused unit tests covering suggest and route configuration and inputs.

use super::helpers::{workspace, write_utf8};
use super::*;
use crate::input::load_json;
use crate::route::{RouteArgs, RouteConfig, RouteRequest};
use crate::suggest::{SuggestArgs, SuggestConfig, config_from_layers_for_test};
use camino::{Utf8Path, Utf8PathBuf};
use roam_core::TravelMode;
use roam_orchestrator::EngineConfig;
use rstest::rstest;

#[derive(Debug, Copy, Clone)]
enum MissingInput {
    Request,
    Catalogue,
    EngineConfig,
}

fn config_in(root: &Utf8Path) -> SuggestConfig {
    SuggestConfig {
        request_path: root.join("request.json"),
        catalogue: root.join("places.json"),
        database: None,
        engine_config: Some(root.join("engine.json")),
        osrm_base_url: None,
    }
}

#[rstest]
fn converting_suggest_without_request_errors() {
    let args = SuggestArgs {
        catalogue: Some(Utf8PathBuf::from("places.json")),
        ..SuggestArgs::default()
    };

    let err = SuggestConfig::try_from(args).expect_err("missing request should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_SUGGEST_REQUEST);
            assert_eq!(env, ENV_SUGGEST_REQUEST);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn converting_suggest_without_catalogue_errors() {
    let args = SuggestArgs {
        request_path: Some(Utf8PathBuf::from("request.json")),
        ..SuggestArgs::default()
    };

    let err = SuggestConfig::try_from(args).expect_err("missing catalogue should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_CATALOGUE);
            assert_eq!(env, ENV_CATALOGUE);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
#[case(None, None)]
#[case(Some("   "), None)]
#[case(Some("http://osrm:5000"), Some("http://osrm:5000"))]
fn blank_osrm_urls_fall_back_to_estimates(
    #[case] given: Option<&str>,
    #[case] expected: Option<&str>,
) {
    let args = SuggestArgs {
        request_path: Some(Utf8PathBuf::from("request.json")),
        catalogue: Some(Utf8PathBuf::from("places.json")),
        osrm_base_url: given.map(str::to_owned),
        ..SuggestArgs::default()
    };

    let config = SuggestConfig::try_from(args).expect("config should build");
    assert_eq!(config.osrm_base_url.as_deref(), expected);
}

#[rstest]
#[case::missing_request(ARG_SUGGEST_REQUEST, MissingInput::Request)]
#[case::missing_catalogue(ARG_CATALOGUE, MissingInput::Catalogue)]
#[case::missing_engine_config(ARG_ENGINE_CONFIG, MissingInput::EngineConfig)]
fn validate_sources_reports_missing_inputs(
    #[case] expected_field: &'static str,
    #[case] missing: MissingInput,
) {
    let (_tmp, root) = workspace();
    let config = config_in(&root);
    if !matches!(missing, MissingInput::Request) {
        write_utf8(&config.request_path, b"{}");
    }
    if !matches!(missing, MissingInput::Catalogue) {
        write_utf8(&config.catalogue, b"[]");
    }
    if let Some(path) = &config.engine_config
        && !matches!(missing, MissingInput::EngineConfig)
    {
        write_utf8(path, b"{}");
    }

    let err = config.validate_sources().expect_err("expected failure");
    match err {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, expected_field),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_skips_an_unset_engine_config() {
    let (_tmp, root) = workspace();
    let config = SuggestConfig {
        engine_config: None,
        ..config_in(&root)
    };
    write_utf8(&config.request_path, b"{}");
    write_utf8(&config.catalogue, b"[]");

    config.validate_sources().expect("engine config is optional");
}

#[rstest]
fn validate_sources_reports_not_file() {
    let (_tmp, root) = workspace();
    let config = config_in(&root);
    std::fs::create_dir(&config.request_path).expect("request directory");

    let err = config
        .validate_sources()
        .expect_err("expected directory path to fail validation");
    match err {
        CliError::SourcePathNotFile { field, path } => {
            assert_eq!(field, ARG_SUGGEST_REQUEST);
            assert_eq!(path, config.request_path);
        }
        other => panic!("expected SourcePathNotFile, found {other:?}"),
    }
}

#[rstest]
fn partial_engine_configs_keep_defaults() {
    let (_tmp, root) = workspace();
    let path = root.join("engine.json");
    write_utf8(&path, br#"{ "exclusion_window": 5 }"#);

    let config: EngineConfig = load_json(&path, "engine config").expect("config should decode");
    assert_eq!(config.exclusion_window, 5);
    assert_eq!(
        config.candidate_pool_factor,
        EngineConfig::default().candidate_pool_factor
    );
}

#[rstest]
fn load_json_reports_open_and_parse_errors() {
    let (_tmp, root) = workspace();
    let path = root.join("engine.json");

    let err = load_json::<EngineConfig>(&path, "engine config").expect_err("file is absent");
    assert!(matches!(err, CliError::OpenInput { what: "engine config", .. }));

    write_utf8(&path, b"[1, 2");
    let err = load_json::<EngineConfig>(&path, "engine config").expect_err("JSON is truncated");
    match err {
        CliError::ParseInput { what, path: reported, .. } => {
            assert_eq!(what, "engine config");
            assert_eq!(reported, path);
        }
        other => panic!("expected ParseInput, found {other:?}"),
    }
}

#[rstest]
fn route_requests_default_to_walking() {
    let (_tmp, root) = workspace();
    let path = root.join("route.json");
    write_utf8(
        &path,
        br#"{ "origin": { "x": 0.0, "y": 0.0 }, "waypoints": [] }"#,
    );

    let request: RouteRequest = load_json(&path, "route request").expect("request should decode");
    assert_eq!(request.travel_mode, TravelMode::Walking);
    assert!(request.waypoints.is_empty());
}

#[rstest]
fn converting_route_without_request_errors() {
    let err = RouteConfig::try_from(RouteArgs::default()).expect_err("missing request");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_ROUTE_REQUEST);
            assert_eq!(env, ENV_ROUTE_REQUEST);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "request_path": 42 }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let (_tmp, root) = workspace();
    let env_request = root.join("from-env-request.json");
    let cli_catalogue = root.join("from-cli.json");
    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "catalogue": root.join("from-file.json").as_str(),
            "database": root.join("roam.db").as_str(),
            "osrm_base_url": "http://from-file:5000",
        }),
        None,
    );
    composer.push_environment(json!({
        "request_path": env_request.as_str(),
        "catalogue": root.join("from-env.json").as_str(),
    }));
    composer.push_cli(json!({
        "catalogue": cli_catalogue.as_str(),
    }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.request_path, env_request);
    assert_eq!(config.catalogue, cli_catalogue);
    assert_eq!(config.database, Some(root.join("roam.db")));
    assert_eq!(config.engine_config, None);
    assert_eq!(config.osrm_base_url.as_deref(), Some("http://from-file:5000"));
}
