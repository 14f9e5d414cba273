//! Map session: the single owner of layer, viewport and selection state.
//!
//! Every command mutates state and then synchronously rebuilds one
//! [`Snapshot`]. The map paint, legend, live description and data table are
//! all taken from that snapshot, so they can never disagree. Notifications
//! for the host queue up in an outbox drained with
//! [`MapSession::drain_events`].

use geoview_core::config::MapOptions;
use geoview_core::models::{
    parse_layers, Announcement, FeatureRef, LatLng, Layer, LayerId, LayerKind, MapEvent,
    MapMove, PaintParams, ViewportState,
};
use geoview_core::ports::LayerTarget;
use geoview_core::{GeoviewError, Result};
use geoview_geo::{bounding_extent, render_shape};
use serde::Serialize;
use serde_json::Value;

use crate::basemap::{default_base_layer, find_base_layer, BaseLayer};
use crate::keyboard::{Key, KeyOutcome, KeyboardAdapter};
use crate::projection::{
    data_table, describe, legend, legend_summary, popup, DataTable, LegendGroup, Popup,
};
use crate::registry::LayerRegistry;
use crate::selection::{SelectionTracker, SelectionTrigger};
use crate::style::resolve_for_layer;
use crate::viewport::{ViewportController, ViewportPhase};

/// Status shown when a layer fetch fails
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load map data. Please try again later.";

pub const LOADING_MESSAGE: &str = "Loading map data...";

/// One feature as handed to the rendering surface
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFeature {
    pub layer_id: LayerId,
    pub feature_index: usize,
    /// None when the geometry cannot be drawn
    pub shape: Option<geojson::Geometry>,
    pub paint: PaintParams,
    pub aria_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderLayer {
    pub layer_id: LayerId,
    pub name: String,
    pub kind: LayerKind,
    pub features: Vec<RenderFeature>,
}

/// Everything the four views need, derived from one state revision
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub revision: u64,
    pub view: MapMove,
    pub phase: ViewportPhase,
    pub description: String,
    pub legend: Vec<LegendGroup>,
    pub legend_summary: String,
    pub table: DataTable,
    pub render_layers: Vec<RenderLayer>,
    pub base_layer: BaseLayer,
    pub high_contrast: bool,
    pub keyboard_navigation: bool,
    pub data_table_visible: bool,
}

/// Handle for one in-flight layer fetch. Only the most recent ticket is
/// honoured on completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    target: LayerTarget,
}

impl LoadTicket {
    pub fn target(&self) -> &LayerTarget {
        &self.target
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

pub struct MapSession {
    registry: LayerRegistry,
    viewport: ViewportController,
    selection: SelectionTracker,
    keyboard: KeyboardAdapter,
    default_zoom: u8,
    focused_feature: Option<FeatureRef>,
    high_contrast: bool,
    data_table_visible: bool,
    base_layer: Option<&'static BaseLayer>,
    load_generation: u64,
    revision: u64,
    snapshot: Snapshot,
    events: Vec<MapEvent>,
}

impl MapSession {
    pub fn new(options: MapOptions) -> Self {
        let viewport = ViewportController::new(
            ViewportState::new(options.center, options.zoom),
            options.viewport,
            options.zoom_range,
        );
        let keyboard =
            KeyboardAdapter::new(viewport.state(), options.pan_step, options.keyboard_navigation);
        let registry = LayerRegistry::new();
        let selection = SelectionTracker::new();
        let snapshot = build_snapshot(&SnapshotInputs {
            revision: 0,
            registry: &registry,
            viewport: &viewport,
            selection: &selection,
            keyboard_navigation: keyboard.is_enabled(),
            high_contrast: options.high_contrast,
            data_table_visible: false,
            base_layer: None,
        });

        Self {
            registry,
            viewport,
            selection,
            keyboard,
            default_zoom: options.zoom,
            focused_feature: None,
            high_contrast: options.high_contrast,
            data_table_visible: false,
            base_layer: None,
            load_generation: 0,
            revision: 0,
            snapshot,
            events: Vec::new(),
        }
    }

    // Layer commands

    /// Replace the layer set and activate every layer. Any selection is
    /// dropped.
    pub fn set_layers(&mut self, layers: Vec<Layer>) {
        self.reset_selection();
        self.registry.set_layers(layers);
        self.registry.activate_all();
        self.events.push(MapEvent::LayerToggled(self.registry.activation_map()));
        self.refresh();
    }

    /// Set a layer's activation. Returns false for an unknown id, in which
    /// case nothing is emitted.
    pub fn toggle_layer(&mut self, id: &LayerId, active: bool) -> bool {
        if !self.registry.toggle_layer(id, active) {
            return false;
        }
        self.events.push(MapEvent::LayerToggled(self.registry.activation_map()));
        self.refresh();
        true
    }

    /// Start loading layers for `target`. Any earlier ticket becomes stale.
    pub fn begin_load(&mut self, target: LayerTarget) -> LoadTicket {
        self.load_generation += 1;
        tracing::info!(scope = %target, generation = self.load_generation, "Loading layers");
        self.events.push(MapEvent::Status(LOADING_MESSAGE.to_string()));
        LoadTicket { generation: self.load_generation, target }
    }

    /// Apply the outcome of a fetch.
    ///
    /// Stale tickets are discarded and return false. A failure keeps the
    /// last good state and reports a status message. On success the view
    /// fits the first layer's extent, or the bounds of its features when the
    /// payload has no extent.
    pub fn complete_load(&mut self, ticket: LoadTicket, result: Result<Value>) -> bool {
        if ticket.generation != self.load_generation {
            tracing::debug!(
                scope = %ticket.target,
                generation = ticket.generation,
                latest = self.load_generation,
                "Discarding stale layer response"
            );
            return false;
        }

        let layers = match result.and_then(|payload| parse_layers(&payload)) {
            Ok(layers) => layers,
            Err(e) => {
                tracing::error!(scope = %ticket.target, error = %e, "Layer load failed");
                self.events.push(MapEvent::Status(LOAD_FAILED_MESSAGE.to_string()));
                return true;
            }
        };

        tracing::info!(scope = %ticket.target, count = layers.len(), "Layers loaded");
        let extent = layers
            .first()
            .and_then(|l| l.extent.or_else(|| bounding_extent(l.features())));
        self.reset_selection();
        self.registry.set_layers(layers);
        self.registry.activate_all();
        self.events.push(MapEvent::LayerToggled(self.registry.activation_map()));

        if let Some(extent) = extent {
            self.viewport.fit_bounds(&extent, self.default_zoom);
            self.finish_move();
        }
        self.refresh();
        true
    }

    /// Drop every layer, as when the view goes away
    pub fn clear(&mut self) {
        self.registry.clear();
        self.reset_selection();
        self.refresh();
    }

    /// Forget the selection and keyboard focus. Feature references are only
    /// meaningful for the layer set they were made against.
    fn reset_selection(&mut self) {
        if self.selection.clear() {
            self.events.push(MapEvent::SelectionChanged(None));
        }
        self.focused_feature = None;
    }

    // Viewport commands

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.viewport.pan_by(dx, dy);
        self.refresh();
    }

    pub fn set_zoom(&mut self, level: i32) {
        self.viewport.set_zoom(level);
        self.refresh();
    }

    pub fn set_view(&mut self, center: LatLng, zoom: i32) {
        self.viewport.set_view(center, zoom);
        self.refresh();
    }

    /// Complete the pending pan/zoom. Emits one `MapMoved` if anything moved.
    pub fn move_end(&mut self) {
        self.finish_move();
        self.refresh();
    }

    // Keyboard and focus

    /// Focus or blur the map surface
    pub fn set_focus(&mut self, focused: bool) {
        if let Some(announcement) = self.keyboard.set_focus(focused) {
            self.events.push(MapEvent::Announce(announcement));
        }
    }

    /// Give keyboard focus to a feature so Enter/Space can select it
    pub fn focus_feature(&mut self, feature: Option<FeatureRef>) {
        self.focused_feature = feature;
    }

    pub fn handle_key(&mut self, key: &Key) -> KeyOutcome {
        let outcome = self.keyboard.handle_key(key, &mut self.viewport);
        if outcome == KeyOutcome::Ignored {
            return outcome;
        }
        match &outcome {
            KeyOutcome::Ignored => {}
            KeyOutcome::Moved(Some(moved)) => self.events.push(MapEvent::MapMoved(*moved)),
            KeyOutcome::Moved(None) => {}
            KeyOutcome::Select => {
                if let Some(target) = self.focused_feature.clone() {
                    self.select(target, SelectionTrigger::Keyboard);
                }
            }
            KeyOutcome::ClearSelection => {
                if self.selection.clear() {
                    self.events.push(MapEvent::SelectionChanged(None));
                }
            }
        }
        self.refresh();
        outcome
    }

    // Selection

    /// Select a feature as a click would. Features of inactive or unknown
    /// layers cannot be selected.
    pub fn select_feature(&mut self, layer_id: LayerId, feature_index: usize) -> bool {
        let selected = self.select(FeatureRef { layer_id, feature_index }, SelectionTrigger::Click);
        self.refresh();
        selected
    }

    pub fn clear_selection(&mut self) {
        if self.selection.clear() {
            self.events.push(MapEvent::SelectionChanged(None));
        }
        self.refresh();
    }

    // Accessibility options

    pub fn set_keyboard_navigation(&mut self, enabled: bool) {
        self.keyboard.set_enabled(enabled);
        self.refresh();
    }

    /// Switch contrast mode. The base layer goes back to the mode's default,
    /// replacing any earlier [`select_base_layer`](Self::select_base_layer).
    pub fn set_high_contrast(&mut self, enabled: bool) {
        self.high_contrast = enabled;
        self.base_layer = None;
        self.refresh();
    }

    pub fn set_data_table_visible(&mut self, visible: bool) {
        self.data_table_visible = visible;
        self.refresh();
    }

    /// Pick a base layer by name. Returns false for an unknown name.
    pub fn select_base_layer(&mut self, name: &str) -> bool {
        let Some(layer) = find_base_layer(name) else {
            return false;
        };
        self.base_layer = Some(layer);
        self.refresh();
        true
    }

    // Readers

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn registry(&self) -> &LayerRegistry {
        &self.registry
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    /// Popup for a feature of an active layer
    pub fn popup(&self, feature: &FeatureRef) -> Result<Option<Popup>> {
        let layer = self
            .registry
            .layer(&feature.layer_id)
            .filter(|l| l.active)
            .ok_or_else(|| GeoviewError::LayerNotFound { id: feature.layer_id.to_string() })?;
        Ok(popup(layer, feature.feature_index))
    }

    /// Hand queued events to the host
    pub fn drain_events(&mut self) -> Vec<MapEvent> {
        std::mem::take(&mut self.events)
    }

    fn select(&mut self, target: FeatureRef, trigger: SelectionTrigger) -> bool {
        let exists = self
            .registry
            .layer(&target.layer_id)
            .filter(|l| l.active)
            .is_some_and(|l| target.feature_index < l.features().len());
        if !exists {
            tracing::debug!(
                layer_id = %target.layer_id,
                index = target.feature_index,
                "Selection target unavailable"
            );
            return false;
        }
        let reference = target.clone();
        if self.selection.select(target.layer_id, target.feature_index, trigger) {
            self.events.push(MapEvent::SelectionChanged(Some(reference)));
        }
        true
    }

    fn finish_move(&mut self) {
        if let Some(moved) = self.viewport.move_end() {
            self.events.push(MapEvent::MapMoved(moved));
        }
    }

    fn refresh(&mut self) {
        self.revision += 1;
        let snapshot = build_snapshot(&SnapshotInputs {
            revision: self.revision,
            registry: &self.registry,
            viewport: &self.viewport,
            selection: &self.selection,
            keyboard_navigation: self.keyboard.is_enabled(),
            high_contrast: self.high_contrast,
            data_table_visible: self.data_table_visible,
            base_layer: self.base_layer,
        });
        if snapshot.description != self.snapshot.description {
            let announcement = Announcement::new(snapshot.description.clone());
            self.events.push(MapEvent::Announce(announcement));
        }
        self.snapshot = snapshot;
    }
}

struct SnapshotInputs<'a> {
    revision: u64,
    registry: &'a LayerRegistry,
    viewport: &'a ViewportController,
    selection: &'a SelectionTracker,
    keyboard_navigation: bool,
    high_contrast: bool,
    data_table_visible: bool,
    base_layer: Option<&'static BaseLayer>,
}

fn build_snapshot(inputs: &SnapshotInputs<'_>) -> Snapshot {
    let active = inputs.registry.active_layers();
    let view = inputs.viewport.current_move();
    let groups = legend(&active);

    Snapshot {
        revision: inputs.revision,
        view,
        phase: inputs.viewport.phase(),
        description: describe(&view, &active),
        legend_summary: legend_summary(&groups),
        legend: groups,
        table: data_table(&active, inputs.selection.current()),
        render_layers: active.iter().map(|layer| render_layer(layer)).collect(),
        base_layer: *inputs.base_layer.unwrap_or_else(|| default_base_layer(inputs.high_contrast)),
        high_contrast: inputs.high_contrast,
        keyboard_navigation: inputs.keyboard_navigation,
        data_table_visible: inputs.data_table_visible,
    }
}

fn render_layer(layer: &Layer) -> RenderLayer {
    let features = layer
        .features()
        .iter()
        .enumerate()
        .map(|(feature_index, feature)| {
            let name = feature
                .property_text("name")
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "Unnamed feature".to_string());
            RenderFeature {
                layer_id: layer.id.clone(),
                feature_index,
                shape: render_shape(&feature.geometry),
                paint: resolve_for_layer(layer, feature),
                aria_label: format!("{} - Click to view details", name),
            }
        })
        .collect();

    RenderLayer {
        layer_id: layer.id.clone(),
        name: layer.name.clone(),
        kind: layer.kind(),
        features,
    }
}
