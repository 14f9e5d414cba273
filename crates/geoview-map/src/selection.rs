//! Selected-feature tracking.
//!
//! The tracker only holds a weak `(layer id, index)` reference. Readers
//! resolve it against the registry every time, so a selection whose layer
//! was deactivated or removed simply reads as absent.

use geoview_core::models::{Feature, FeatureRef, Layer, LayerId};
use serde::Serialize;

use crate::registry::LayerRegistry;

/// How a selection was made; recorded for logging only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionTrigger {
    Click,
    Keyboard,
}

/// A selection that resolved to a live feature
#[derive(Debug, Clone, Copy)]
pub struct ResolvedSelection<'a> {
    pub reference: &'a FeatureRef,
    pub layer: &'a Layer,
    pub feature: &'a Feature,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    current: Option<FeatureRef>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a feature. Returns true when the selection changed.
    pub fn select(
        &mut self,
        layer_id: LayerId,
        feature_index: usize,
        trigger: SelectionTrigger,
    ) -> bool {
        let next = FeatureRef { layer_id, feature_index };
        tracing::debug!(layer_id = %next.layer_id, feature_index, ?trigger, "Feature selected");
        if self.current.as_ref() == Some(&next) {
            return false;
        }
        self.current = Some(next);
        true
    }

    /// Returns true when there was a selection to clear
    pub fn clear(&mut self) -> bool {
        self.current.take().is_some()
    }

    /// Raw reference, which may be stale
    pub fn current(&self) -> Option<&FeatureRef> {
        self.current.as_ref()
    }

    /// The selected feature if its layer is still registered and active and
    /// the index is still in range
    pub fn resolve<'a>(&'a self, registry: &'a LayerRegistry) -> Option<ResolvedSelection<'a>> {
        let reference = self.current.as_ref()?;
        let layer = registry.layer(&reference.layer_id).filter(|l| l.active)?;
        let feature = layer.features().get(reference.feature_index)?;
        Some(ResolvedSelection { reference, layer, feature })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoview_core::models::{GeometrySource, LatLng};

    fn registry() -> LayerRegistry {
        let mut registry = LayerRegistry::new();
        registry.set_layers(vec![Layer::new(
            "1",
            "Office",
            GeometrySource::marker(LatLng::new(40.7, -74.0), "Office"),
        )]);
        registry.activate_all();
        registry
    }

    #[test]
    fn test_resolves_while_layer_active() {
        let registry = registry();
        let mut selection = SelectionTracker::new();
        assert!(selection.select(LayerId::from("1"), 0, SelectionTrigger::Click));

        let resolved = selection.resolve(&registry).unwrap();
        assert_eq!(resolved.layer.name, "Office");
    }

    #[test]
    fn test_deactivated_layer_reads_as_no_selection() {
        let mut registry = registry();
        let mut selection = SelectionTracker::new();
        selection.select(LayerId::from("1"), 0, SelectionTrigger::Keyboard);

        registry.toggle_layer(&LayerId::from("1"), false);
        assert!(selection.resolve(&registry).is_none());
        assert!(selection.current().is_some());

        registry.toggle_layer(&LayerId::from("1"), true);
        assert!(selection.resolve(&registry).is_some());
    }

    #[test]
    fn test_out_of_range_index() {
        let registry = registry();
        let mut selection = SelectionTracker::new();
        selection.select(LayerId::from("1"), 3, SelectionTrigger::Click);
        assert!(selection.resolve(&registry).is_none());
    }

    #[test]
    fn test_reselect_and_clear() {
        let mut selection = SelectionTracker::new();
        assert!(selection.select(LayerId::from("1"), 0, SelectionTrigger::Click));
        assert!(!selection.select(LayerId::from("1"), 0, SelectionTrigger::Keyboard));
        assert!(selection.clear());
        assert!(!selection.clear());
    }
}
