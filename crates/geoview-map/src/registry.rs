//! Canonical set of layers and their activation flags.

use std::collections::HashSet;

use geoview_core::models::{parse_layers, ActivationMap, Layer, LayerId};
use serde_json::Value;

/// Ordered layer collection. Layers keep insertion order; activation is only
/// changed through [`LayerRegistry::toggle_layer`] and
/// [`LayerRegistry::activate_all`].
#[derive(Debug, Clone, Default)]
pub struct LayerRegistry {
    layers: Vec<Layer>,
    revision: u64,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the full layer set. Duplicate ids keep their first occurrence.
    pub fn set_layers(&mut self, layers: Vec<Layer>) {
        let mut seen = HashSet::new();
        self.layers = layers
            .into_iter()
            .filter(|layer| {
                let fresh = seen.insert(layer.id.clone());
                if !fresh {
                    tracing::warn!(layer_id = %layer.id, "Dropping duplicate layer");
                }
                fresh
            })
            .collect();
        self.bump();
        tracing::debug!(count = self.layers.len(), revision = self.revision, "Layer set replaced");
    }

    /// Replace the layer set from a raw backend payload.
    ///
    /// A payload that is not an array of descriptors yields an empty set.
    /// Returns the number of layers now registered.
    pub fn set_layers_from_json(&mut self, payload: &Value) -> usize {
        let layers = match parse_layers(payload) {
            Ok(layers) => layers,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring layer payload");
                Vec::new()
            }
        };
        self.set_layers(layers);
        self.layers.len()
    }

    /// Set a layer's activation.
    ///
    /// Returns false, without touching state, when the id is unknown.
    /// Re-asserting the current flag still counts as a change so observers
    /// are notified.
    pub fn toggle_layer(&mut self, id: &LayerId, active: bool) -> bool {
        let Some(layer) = self.layers.iter_mut().find(|l| &l.id == id) else {
            tracing::debug!(layer_id = %id, "Toggle for unknown layer ignored");
            return false;
        };
        layer.active = active;
        self.bump();
        true
    }

    pub fn activate_all(&mut self) {
        for layer in &mut self.layers {
            layer.active = true;
        }
        self.bump();
    }

    /// Active layers in insertion order
    pub fn active_layers(&self) -> Vec<&Layer> {
        self.layers.iter().filter(|l| l.active).collect()
    }

    pub fn layer(&self, id: &LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| &l.id == id)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn is_active(&self, id: &LayerId) -> bool {
        self.layer(id).map(|l| l.active).unwrap_or(false)
    }

    /// Ordered `id -> active` map, the payload of a layer toggle notification
    pub fn activation_map(&self) -> ActivationMap {
        self.layers.iter().map(|l| (l.id.clone(), l.active)).collect()
    }

    pub fn clear(&mut self) {
        self.layers.clear();
        self.bump();
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Incremented on every mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn bump(&mut self) {
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoview_core::models::{GeometrySource, LatLng};
    use serde_json::json;

    fn marker(id: &str, name: &str) -> Layer {
        Layer::new(id, name, GeometrySource::marker(LatLng::new(40.7, -74.0), name))
    }

    fn registry() -> LayerRegistry {
        let mut registry = LayerRegistry::new();
        registry.set_layers(vec![marker("a", "Alpha"), marker("b", "Beta"), marker("c", "Gamma")]);
        registry
    }

    #[test]
    fn test_active_layers_keep_insertion_order() {
        let mut registry = registry();
        registry.toggle_layer(&LayerId::from("c"), true);
        registry.toggle_layer(&LayerId::from("a"), true);

        let names: Vec<_> = registry.active_layers().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Gamma"]);
    }

    #[test]
    fn test_toggle_unknown_layer() {
        let mut registry = registry();
        let revision = registry.revision();
        assert!(!registry.toggle_layer(&LayerId::from("missing"), true));
        assert_eq!(registry.revision(), revision);
    }

    #[test]
    fn test_toggle_no_op_still_counts() {
        let mut registry = registry();
        let revision = registry.revision();
        assert!(registry.toggle_layer(&LayerId::from("a"), false));
        assert_eq!(registry.revision(), revision + 1);
        assert!(!registry.is_active(&LayerId::from("a")));
    }

    #[test]
    fn test_duplicates_keep_first() {
        let mut registry = LayerRegistry::new();
        registry.set_layers(vec![marker("a", "First"), marker("a", "Second")]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.layers()[0].name, "First");
    }

    #[test]
    fn test_non_array_payload_empties_registry() {
        let mut registry = registry();
        assert_eq!(registry.set_layers_from_json(&json!({"layers": []})), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_activation_map_order() {
        let mut registry = registry();
        registry.activate_all();
        registry.toggle_layer(&LayerId::from("b"), false);

        let map = registry.activation_map();
        let entries: Vec<_> = map.iter().map(|(id, active)| (id.as_str(), *active)).collect();
        assert_eq!(entries, vec![("a", true), ("b", false), ("c", true)]);
    }

    #[test]
    fn test_set_layers_from_json_numeric_ids() {
        let mut registry = LayerRegistry::new();
        let count = registry.set_layers_from_json(&json!([
            {"id": 1, "name": "Parcels", "type": "geojson", "data": {"type": "FeatureCollection", "features": []}},
            {"id": "2", "name": "Office", "type": "marker", "position": [40.7, -74.0]}
        ]));
        assert_eq!(count, 2);
        assert!(registry.layer(&LayerId::from(1u64)).is_some());
        assert!(registry.layer(&LayerId::from("2")).is_some());
    }
}
