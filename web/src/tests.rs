use crate::{app, state::SharedState, wait_for_shutdown};
use axum::{
    Router,
    body::{Body, Bytes},
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use libcenote::survey::SurveyConfig;
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tempfile::TempDir;
use test_log::test;
use tower::Service;

const SPECIES_CSV: &str = "latitude,longitud,bird,fish_sp\n\
    20.000,-89.000,1,0\n\
    21.0,-87.0,0,0\n\
    bad,-87.0,1,1\n";
const CENOTES_CSV: &str = "latitude,longitud,wellA\n20.000,-89.000,1\n";
const FISH_CSV: &str = "latitude,longitud,tetra\n20.0000001,-89.0,1\n";

/// Writes a survey into a temporary directory and returns an app that serves it
fn test_app(species: &str) -> (Router, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    for (name, contents) in [
        ("species.csv", species),
        ("cenotes.csv", CENOTES_CSV),
        ("fish.csv", FISH_CSV),
    ] {
        std::fs::write(dir.path().join(name), contents).expect("Failed to write csv");
    }
    let yaml = format!(
        r#"datadir: {}
species: {{ location: species.csv, categories: [bird, fish_sp] }}
cenotes: {{ location: cenotes.csv, categories: [wellA] }}
fish: {{ location: fish.csv, categories: [tetra] }}"#,
        dir.path().display()
    );
    let survey = SurveyConfig::from_yaml(&yaml).expect("Failed to parse survey");
    (app(Arc::new(SharedState::test(survey))), dir)
}

async fn get(app: &mut Router, uri: &str) -> (StatusCode, Bytes) {
    let req = Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .expect("Failed to build request");
    let response = app
        .as_service()
        .call(req)
        .await
        .expect("Failed to execute request");
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    (status, body)
}

async fn get_json(app: &mut Router, uri: &str) -> Value {
    let (status, body) = get(app, uri).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&body).expect("Response was not json")
}

#[test(tokio::test)]
async fn test_index() {
    let (mut app, _dir) = test_app(SPECIES_CSV);
    let (status, body) = get(&mut app, "/").await;
    assert_eq!(status, StatusCode::OK);
    let html = std::str::from_utf8(&body).expect("Body was not utf8");
    assert!(html.contains(r#"id="map-config""#));
    assert!(html.contains("maxBoundsViscosity"));
    assert!(html.contains("/api/v1/overlay"));
    assert!(html.contains("height: 94vh"));
}

#[test(tokio::test)]
async fn test_overlay() {
    let (mut app, _dir) = test_app(SPECIES_CSV);
    let surface = get_json(&mut app, "/api/v1/overlay").await;

    let markers = surface["markers"].as_array().expect("markers missing");
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0]["tier"], "orange");
    assert_eq!(markers[0]["score"], 2);
    assert_eq!(markers[0]["style"]["fillColor"], "orange");
    assert_eq!(markers[0]["style"]["radius"], 5.0);
    let popup = markers[0]["popup"].as_str().expect("popup missing");
    assert!(popup.contains("bird"));
    assert!(popup.contains("wellA"));
    // the fish row is 0.0000001 degrees away and must not join
    assert!(!popup.contains("tetra"));
    assert_eq!(markers[1]["tier"], "gray");

    assert_eq!(surface["grid"].as_array().map(Vec::len), Some(146));
    assert_eq!(surface["options"]["minZoom"], 8);
    assert_eq!(surface["options"]["dragging"], false);
    assert!(surface["icons"]["iconUrl"].is_string());
}

#[test(tokio::test)]
async fn test_overlay_is_fresh_per_request() {
    let (mut app, _dir) = test_app(SPECIES_CSV);
    let first = get_json(&mut app, "/api/v1/overlay").await;
    let second = get_json(&mut app, "/api/v1/overlay").await;
    assert_eq!(first, second);
    assert_eq!(second["markers"].as_array().map(Vec::len), Some(2));
}

#[test(tokio::test)]
async fn test_grid() {
    let (mut app, _dir) = test_app(SPECIES_CSV);
    let grid = get_json(&mut app, "/api/v1/grid").await;
    let lines = grid.as_array().expect("grid should be a list");
    assert_eq!(lines.len(), 65 + 81);
    assert_eq!(lines[0]["style"]["color"], "gray");
}

#[test(tokio::test)]
async fn test_data_files_are_served() {
    let (mut app, _dir) = test_app(SPECIES_CSV);
    let (status, body) = get(&mut app, "/data/cenotes.csv").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], CENOTES_CSV.as_bytes());
}

#[test(tokio::test)]
async fn test_schema_mismatch() {
    let (mut app, _dir) = test_app("latitude,longitud,bird\n20.0,-89.0,1\n");
    let (status, _) = get(&mut app, "/api/v1/overlay").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[test(tokio::test)]
async fn test_shutdown_waits_for_signal() {
    wait_for_shutdown(async { Ok(()) }).await;

    let broken = wait_for_shutdown(async { Err(std::io::ErrorKind::Unsupported.into()) });
    assert!(
        tokio::time::timeout(Duration::from_millis(50), broken)
            .await
            .is_err(),
        "A signal that can't be installed should not shut the server down"
    );
}
