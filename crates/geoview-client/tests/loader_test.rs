//! Integration tests for loading layers into a map session

use std::io::Write;

use async_trait::async_trait;
use geoview_client::{fetch_for_ticket, load_layers, FileLayerSource};
use geoview_core::config::MapOptions;
use geoview_core::error::{GeoviewError, Result};
use geoview_core::models::MapEvent;
use geoview_core::ports::{LayerSource, LayerTarget};
use geoview_map::MapSession;
use serde_json::{json, Value};
use tempfile::NamedTempFile;

fn layer_file(payload: &Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", payload).unwrap();
    file
}

/// Source answering with a fixed payload
struct StaticSource(Value);

#[async_trait]
impl LayerSource for StaticSource {
    async fn fetch_layers(&self, _target: &LayerTarget) -> Result<Value> {
        Ok(self.0.clone())
    }

    fn source_name(&self) -> &str {
        "static"
    }
}

#[tokio::test]
async fn test_load_from_file() {
    let file = layer_file(&json!([
        {"id": "roads", "name": "Roads", "type": "geojson",
         "data": {"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"name": "Main St"},
             "geometry": {"type": "LineString", "coordinates": [[-74.02, 40.71], [-74.00, 40.71]]}}
         ]}}
    ]));
    let source = FileLayerSource::new(file.path());
    let mut session = MapSession::new(MapOptions::default());

    assert!(load_layers(&mut session, &source, LayerTarget::All).await);
    let snapshot = session.snapshot();
    assert_eq!(snapshot.table.all_features.len(), 1);
    assert_eq!(
        snapshot.table.all_features[0].coordinates,
        "2 points, starting at Lat: 40.7100, Lng: -74.0200"
    );
}

#[tokio::test]
async fn test_missing_file_reports_status() {
    let source = FileLayerSource::new("/nonexistent/layers.json");
    assert!(matches!(
        source.fetch_layers(&LayerTarget::All).await,
        Err(GeoviewError::LayerFetch { .. })
    ));

    let mut session = MapSession::new(MapOptions::default());
    load_layers(&mut session, &source, LayerTarget::Dataset("3".to_string())).await;
    let events = session.drain_events();
    assert!(events.contains(&MapEvent::Status(
        "Failed to load map data. Please try again later.".to_string()
    )));
    assert!(session.registry().is_empty());
}

#[tokio::test]
async fn test_invalid_json_is_a_serialization_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();
    let source = FileLayerSource::new(file.path());
    assert!(matches!(
        source.fetch_layers(&LayerTarget::All).await,
        Err(GeoviewError::Serialization(_))
    ));
}

#[tokio::test]
async fn test_out_of_order_responses() {
    let older =
        StaticSource(json!([{"id": 1, "name": "Old", "type": "marker", "position": [0.0, 0.0]}]));
    let newer =
        StaticSource(json!([{"id": 2, "name": "New", "type": "marker", "position": [1.0, 1.0]}]));
    let mut session = MapSession::new(MapOptions::default());

    let first = session.begin_load(LayerTarget::Dataset("old".to_string()));
    let second = session.begin_load(LayerTarget::Dataset("new".to_string()));
    let (first, old_result) = fetch_for_ticket(&older, first).await;
    let (second, new_result) = fetch_for_ticket(&newer, second).await;

    assert!(session.complete_load(second, new_result));
    assert!(!session.complete_load(first, old_result));
    let names: Vec<_> = session.registry().layers().iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["New"]);
}
