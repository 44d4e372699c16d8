//! Test helpers for writing CLI inputs into temporary workspaces.

use camino::{Utf8Path, Utf8PathBuf};
use geo::Coord;
use roam_core::{Place, test_support::place_near};
use tempfile::TempDir;

pub(super) const ORIGIN: Coord<f64> = Coord { x: -3.1883, y: 55.9533 };

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write test input");
}

pub(super) fn workspace() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

/// Six museums spread east of the origin, all within a kilometre.
pub(super) fn museums() -> Vec<Place> {
    (1_u32..=6)
        .map(|n| {
            let step = f64::from(n);
            place_near(ORIGIN, &format!("museum-{n}"), "museum", step * 120.0, -step * 60.0)
        })
        .collect()
}

pub(super) fn write_catalogue(path: &Utf8Path, places: &[Place]) {
    let payload = serde_json::to_vec_pretty(places).expect("serialise catalogue");
    write_utf8(path, &payload);
}

pub(super) fn suggestion_request_json(radius_m: f64) -> String {
    serde_json::json!({
        "user_id": "walker",
        "latitude": ORIGIN.y,
        "longitude": ORIGIN.x,
        "radius_m": radius_m,
        "intent": "QUICK_SUGGESTION",
        "seed": 7,
    })
    .to_string()
}

/// Place identifiers of a printed suggestion response, in order.
pub(super) fn suggested_ids(stdout: &[u8]) -> Vec<String> {
    let response: serde_json::Value =
        serde_json::from_slice(stdout).expect("output should be JSON");
    response
        .get("suggestions")
        .and_then(serde_json::Value::as_array)
        .expect("response lists suggestions")
        .iter()
        .filter_map(|candidate| {
            candidate
                .pointer("/place/id")
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned)
        })
        .collect()
}
