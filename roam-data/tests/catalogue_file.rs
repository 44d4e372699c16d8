#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

//! Loading a [`JsonPlaceCatalogue`] from disk.

use std::io::Write;

use camino::Utf8PathBuf;
use roam_core::{PlaceQuery, PlaceSearch};
use roam_data::{CatalogueError, JsonPlaceCatalogue};
use rstest::rstest;
use tempfile::{NamedTempFile, TempDir};

const CATALOGUE: &str = r#"[
    {
        "id": "gallery",
        "name": "Gallery",
        "category": "art_gallery",
        "location": { "x": -3.19, "y": 55.95 },
        "rating": 4.6,
        "review_count": 812
    },
    {
        "id": "pier",
        "name": "Pier",
        "category": "viewpoint",
        "location": { "x": -3.30, "y": 56.00 }
    }
]"#;

fn write_catalogue(contents: &str) -> (NamedTempFile, Utf8PathBuf) {
    let mut file = NamedTempFile::new().expect("create catalogue file");
    file.write_all(contents.as_bytes()).expect("write catalogue");
    let path = Utf8PathBuf::from_path_buf(file.path().to_path_buf()).expect("UTF-8 temp path");
    (file, path)
}

#[rstest]
fn places_load_with_optional_fields_defaulted() {
    let (_file, path) = write_catalogue(CATALOGUE);
    let catalogue = JsonPlaceCatalogue::from_path(&path).expect("catalogue loads");
    assert_eq!(catalogue.len(), 2);

    let found = catalogue
        .search(&PlaceQuery {
            latitude: 55.95,
            longitude: -3.19,
            radius_m: 1_000.0,
            category_hint: None,
            limit: 10,
        })
        .expect("search succeeds");
    let gallery = found.first().expect("gallery is in range");
    assert_eq!(gallery.id, "gallery");
    assert_eq!(gallery.review_count, 812);
    assert_eq!(found.len(), 1);
}

#[rstest]
fn malformed_files_are_parse_errors() {
    let (_file, path) = write_catalogue(r#"{ "id": "not-an-array" }"#);
    let error = JsonPlaceCatalogue::from_path(&path).expect_err("object is not a catalogue");
    assert!(matches!(error, CatalogueError::Parse { path: ref reported, .. } if *reported == path));
}

#[rstest]
fn missing_files_are_open_errors() {
    let dir = TempDir::new().expect("create temp dir");
    let path = Utf8PathBuf::from_path_buf(dir.path().join("absent.json")).expect("UTF-8 temp path");
    let error = JsonPlaceCatalogue::from_path(&path).expect_err("file does not exist");
    assert!(matches!(error, CatalogueError::Open { .. }));
    assert!(error.to_string().contains("absent.json"));
}
