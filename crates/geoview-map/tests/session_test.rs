//! Integration tests for the map session
//!
//! These tests drive the session through its command API and check that the
//! snapshot projections and emitted events stay consistent.

use geoview_core::config::MapOptions;
use geoview_core::models::{parse_layers, FeatureRef, LatLng, LayerId, MapEvent};
use geoview_core::ports::LayerTarget;
use geoview_core::GeoviewError;
use geoview_geo::mercator;
use geoview_map::session::LOAD_FAILED_MESSAGE;
use geoview_map::{Key, KeyOutcome, MapSession, SelectedFeatureDetail, TableTab};
use serde_json::{json, Value};

fn layers_payload() -> Value {
    json!([
        {
            "id": 1,
            "name": "Land Use",
            "type": "geojson",
            "description": "Zoning parcels",
            "data": {
                "type": "FeatureCollection",
                "features": [
                    {
                        "type": "Feature",
                        "properties": {"name": "Residential Area", "zone": "residential"},
                        "geometry": {"type": "Polygon", "coordinates": [[
                            [-74.01, 40.71], [-74.01, 40.72], [-74.00, 40.72], [-74.00, 40.71], [-74.01, 40.71]
                        ]]}
                    },
                    {
                        "type": "Feature",
                        "properties": {"name": "Mall", "zone": "commercial"},
                        "geometry": {"type": "Point", "coordinates": [-74.005, 40.715]}
                    }
                ]
            },
            "style": {
                "type": "categorical",
                "property": "zone",
                "values": {"residential": {"color": "#ffeda0", "opacity": 0.7}}
            }
        },
        {
            "id": 2,
            "name": "Points of Interest",
            "type": "marker",
            "position": [40.715, -74.005],
            "popupContent": "City Center"
        }
    ])
}

fn loaded_session() -> MapSession {
    let mut session = MapSession::new(MapOptions::default());
    let ticket = session.begin_load(LayerTarget::All);
    assert!(session.complete_load(ticket, Ok(layers_payload())));
    session.drain_events();
    session
}

fn map_moves(events: &[MapEvent]) -> usize {
    events.iter().filter(|e| matches!(e, MapEvent::MapMoved(_))).count()
}

#[test]
fn test_empty_session_describes_no_layers() {
    let session = MapSession::new(MapOptions::default());
    let snapshot = session.snapshot();
    assert!(snapshot.description.starts_with(
        "Interactive map centered at latitude 51.5050 and longitude -0.0900, zoom level 13."
    ));
    assert!(snapshot.description.contains(" No data layers are currently active."));
    assert!(snapshot.legend.is_empty());
    assert_eq!(snapshot.base_layer.name, "OpenStreetMap Standard");
}

#[test]
fn test_pan_north_emits_single_map_moved() {
    let mut session = MapSession::new(MapOptions::default());
    let (_, y) = mercator::project(LatLng::new(51.505, -0.09), 13);
    let expected_lat = mercator::unproject(0.0, y - 100.0, 13).lat;

    session.pan_by(0.0, -100.0);
    session.move_end();
    let events = session.drain_events();

    assert_eq!(map_moves(&events), 1);
    let moved = events
        .iter()
        .find_map(|e| match e {
            MapEvent::MapMoved(moved) => Some(*moved),
            _ => None,
        })
        .unwrap();
    assert!((moved.center.lat - expected_lat).abs() < 1e-9);
    assert!(moved.bounds.north > moved.center.lat && moved.bounds.south < moved.center.lat);

    session.move_end();
    assert_eq!(map_moves(&session.drain_events()), 0);
}

#[test]
fn test_load_activates_everything() {
    let session = loaded_session();
    let snapshot = session.snapshot();

    assert_eq!(snapshot.render_layers.len(), 2);
    assert!(snapshot.description.contains(" Showing 2 layers: Land Use, Points of Interest."));
    assert_eq!(snapshot.table.all_features.len(), 3);
    assert_eq!(
        snapshot.legend_summary,
        "Map legend showing 2 active layers: \
         Land Use with categories: residential. Points of Interest."
    );
}

#[test]
fn test_unmatched_category_paints_default() {
    let session = loaded_session();
    let land_use = &session.snapshot().render_layers[0];
    assert_eq!(land_use.features[0].paint.color, "#ffeda0");
    assert_eq!(land_use.features[1].paint.color, "#ccc");
    assert_eq!(land_use.features[1].paint.opacity, 1.0);
    assert_eq!(land_use.features[1].aria_label, "Mall - Click to view details");
}

#[test]
fn test_toggle_emits_activation_map_and_announcement() {
    let mut session = loaded_session();
    assert!(session.toggle_layer(&LayerId::from(2u64), false));

    let events = session.drain_events();
    let activation = events
        .iter()
        .find_map(|e| match e {
            MapEvent::LayerToggled(map) => Some(map.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(activation.get(&LayerId::from("1")), Some(&true));
    assert_eq!(activation.get(&LayerId::from("2")), Some(&false));
    assert!(events.iter().any(
        |e| matches!(e, MapEvent::Announce(a) if a.message.contains("Showing 1 layers: Land Use."))
    ));
}

#[test]
fn test_repeated_toggle_notifies_without_new_announcement() {
    let mut session = loaded_session();
    assert!(session.toggle_layer(&LayerId::from("1"), true));
    let events = session.drain_events();
    assert!(events.iter().any(|e| matches!(e, MapEvent::LayerToggled(_))));
    assert!(!events.iter().any(|e| matches!(e, MapEvent::Announce(_))));
}

#[test]
fn test_toggle_unknown_layer_is_silent() {
    let mut session = loaded_session();
    let revision = session.snapshot().revision;
    assert!(!session.toggle_layer(&LayerId::from("99"), true));
    assert!(session.drain_events().is_empty());
    assert_eq!(session.snapshot().revision, revision);
}

#[test]
fn test_selection_goes_stale_when_layer_deactivated() {
    let mut session = loaded_session();
    assert!(session.select_feature(LayerId::from("1"), 0));
    assert_eq!(session.snapshot().table.default_tab, TableTab::Feature);

    session.toggle_layer(&LayerId::from("1"), false);
    match &session.snapshot().table.selected_feature_detail {
        SelectedFeatureDetail::NoSelection { message } => {
            assert_eq!(
                message,
                "No feature is currently selected. Click on a map feature to view its details."
            )
        }
        other => panic!("Expected no selection, got {:?}", other),
    }
}

#[test]
fn test_projections_agree_on_coordinates() {
    let mut session = loaded_session();
    session.select_feature(LayerId::from("1"), 1);
    let snapshot = session.snapshot();

    let row = &snapshot.table.all_features[1];
    let popup = session.popup(&FeatureRef::new("1", 1)).unwrap().unwrap();
    let detail = match &snapshot.table.selected_feature_detail {
        SelectedFeatureDetail::Feature(detail) => detail,
        other => panic!("Expected a feature, got {:?}", other),
    };

    assert_eq!(row.coordinates, "Lat: 40.7150, Lng: -74.0050");
    assert_eq!(popup.coordinates, row.coordinates);
    assert_eq!(detail.coordinates, row.coordinates);
}

#[test]
fn test_marker_popup_uses_popup_content() {
    let session = loaded_session();
    let popup = session.popup(&FeatureRef::new("2", 0)).unwrap().unwrap();
    assert_eq!(popup.title, "Points of Interest");
    assert_eq!(popup.body.as_deref(), Some("City Center"));
    assert_eq!(popup.coordinates, "40.7150, -74.0050");

    let missing = session.popup(&FeatureRef::new("9", 0));
    assert!(matches!(missing, Err(GeoviewError::LayerNotFound { .. })));
}

#[test]
fn test_keyboard_requires_focus() {
    let mut session = loaded_session();
    assert_eq!(session.handle_key(&Key::ArrowUp), KeyOutcome::Ignored);
    assert!(session.drain_events().is_empty());

    session.set_focus(true);
    let events = session.drain_events();
    assert!(matches!(
        &events[0],
        MapEvent::Announce(a) if a.message.starts_with("Keyboard Navigation")
    ));

    let zoom = session.snapshot().view.zoom;
    assert!(matches!(session.handle_key(&Key::Char('+')), KeyOutcome::Moved(Some(_))));
    assert_eq!(map_moves(&session.drain_events()), 1);
    assert_eq!(session.snapshot().view.zoom, zoom + 1);
}

#[test]
fn test_keyboard_selection() {
    let mut session = loaded_session();
    session.set_focus(true);
    session.focus_feature(Some(FeatureRef::new("2", 0)));
    session.handle_key(&Key::Enter);
    assert_eq!(session.selection().current(), Some(&FeatureRef::new("2", 0)));

    session.handle_key(&Key::Escape);
    assert!(session.selection().current().is_none());
    let events = session.drain_events();
    assert!(events.iter().any(|e| matches!(e, MapEvent::SelectionChanged(None))));
}

#[test]
fn test_stale_load_is_discarded() {
    let mut session = MapSession::new(MapOptions::default());
    let first = session.begin_load(LayerTarget::Dataset("1".to_string()));
    let second = session.begin_load(LayerTarget::Dataset("2".to_string()));

    let payload = json!([{"id": "b", "name": "Second", "type": "marker", "position": [1.0, 2.0]}]);
    assert!(session.complete_load(second, Ok(payload)));
    assert!(!session.complete_load(first, Ok(layers_payload())));
    assert_eq!(session.registry().len(), 1);
    assert_eq!(session.registry().layers()[0].name, "Second");
}

#[test]
fn test_failed_load_keeps_last_good_state() {
    let mut session = loaded_session();
    let before = session.snapshot().clone();

    let ticket = session.begin_load(LayerTarget::Analysis("7".to_string()));
    let failure = GeoviewError::LayerFetch {
        target: "analysis 7".to_string(),
        reason: "timeout".to_string(),
    };
    assert!(session.complete_load(ticket, Err(failure)));

    assert_eq!(session.snapshot(), &before);
    let events = session.drain_events();
    assert!(events.contains(&MapEvent::Status(LOAD_FAILED_MESSAGE.to_string())));
}

#[test]
fn test_load_fits_first_extent() {
    let mut session = MapSession::new(MapOptions::default());
    let ticket = session.begin_load(LayerTarget::All);
    session.complete_load(
        ticket,
        Ok(json!([{
            "id": "a", "name": "Parcels", "type": "geojson",
            "data": {"type": "FeatureCollection", "features": []},
            "extent": {"north": 40.72, "south": 40.70, "east": -74.00, "west": -74.02}
        }])),
    );

    let view = session.snapshot().view;
    assert!((view.center.lat - 40.71).abs() < 1e-9);
    assert!((view.center.lng - -74.01).abs() < 1e-9);
    assert_eq!(view.zoom, 14);
    assert_eq!(map_moves(&session.drain_events()), 1);
}

#[test]
fn test_load_without_extent_fits_feature_bounds() {
    let mut session = MapSession::new(MapOptions::default());
    let ticket = session.begin_load(LayerTarget::All);
    session.complete_load(
        ticket,
        Ok(json!([{
            "id": "a", "name": "Parcels", "type": "geojson",
            "data": {"type": "FeatureCollection", "features": [
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "Point", "coordinates": [-74.02, 40.70]}},
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "Point", "coordinates": [-74.00, 40.72]}}
            ]}
        }])),
    );

    let view = session.snapshot().view;
    assert!((view.center.lat - 40.71).abs() < 1e-9);
    assert!((view.center.lng - -74.01).abs() < 1e-9);
    assert_eq!(view.zoom, 14);
    assert_eq!(map_moves(&session.drain_events()), 1);
}

#[test]
fn test_load_without_extent_or_features_keeps_view() {
    let mut session = MapSession::new(MapOptions::default());
    let ticket = session.begin_load(LayerTarget::All);
    let payload = json!([{
        "id": "a", "name": "Empty", "type": "geojson",
        "data": {"type": "FeatureCollection", "features": []}
    }]);
    assert!(session.complete_load(ticket, Ok(payload)));

    let view = session.snapshot().view;
    assert!((view.center.lat - 51.505).abs() < 1e-9);
    assert_eq!(view.zoom, 13);
    assert_eq!(map_moves(&session.drain_events()), 0);
}

#[test]
fn test_set_layers_drops_selection_from_previous_layers() {
    let mut session = MapSession::new(MapOptions::default());
    let cafes = json!([{"id": 1, "name": "Old Cafe", "type": "marker", "position": [51.5, -0.1]}]);
    session.set_layers(parse_layers(&cafes).unwrap());
    session.set_focus(true);
    session.focus_feature(Some(FeatureRef::new("1", 0)));
    assert!(session.select_feature(LayerId::from("1"), 0));
    session.drain_events();

    let parks = json!([{"id": 1, "name": "New Park", "type": "marker", "position": [48.85, 2.35]}]);
    session.set_layers(parse_layers(&parks).unwrap());

    assert!(session.selection().current().is_none());
    let events = session.drain_events();
    assert!(events.contains(&MapEvent::SelectionChanged(None)));
    let snapshot = session.snapshot();
    assert!(matches!(
        snapshot.table.selected_feature_detail,
        SelectedFeatureDetail::NoSelection { .. }
    ));
    assert_eq!(snapshot.table.default_tab, TableTab::Layers);

    // Enter on the stale focus target must not select the new layer's feature
    session.handle_key(&Key::Enter);
    assert!(session.selection().current().is_none());
}

#[test]
fn test_set_layers_without_selection_emits_no_selection_change() {
    let mut session = loaded_session();
    session.set_layers(parse_layers(&layers_payload()).unwrap());
    let events = session.drain_events();
    assert!(!events.iter().any(|e| matches!(e, MapEvent::SelectionChanged(_))));
    assert!(events.iter().any(|e| matches!(e, MapEvent::LayerToggled(_))));
}

#[test]
fn test_high_contrast_resets_chosen_base_layer() {
    let mut session = MapSession::new(MapOptions::default());
    assert!(session.select_base_layer("Satellite"));
    assert_eq!(session.snapshot().base_layer.name, "Satellite");

    session.set_high_contrast(true);
    assert_eq!(session.snapshot().base_layer.name, "High Contrast");

    session.set_high_contrast(false);
    assert_eq!(session.snapshot().base_layer.name, "OpenStreetMap Standard");
}

#[test]
fn test_high_contrast_selects_base_layer() {
    let mut session = MapSession::new(MapOptions::default());
    session.set_high_contrast(true);
    assert_eq!(session.snapshot().base_layer.name, "High Contrast");
    assert!(session.snapshot().high_contrast);

    assert!(session.select_base_layer("Satellite"));
    assert_eq!(session.snapshot().base_layer.name, "Satellite");
    assert!(!session.select_base_layer("Watercolor"));
}
