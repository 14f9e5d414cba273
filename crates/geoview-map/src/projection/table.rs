//! Tabular view of the active layers for screen-reader users.

use geoview_core::models::{value_text, Feature, FeatureRef, Layer, LayerId, LayerKind};
use geoview_geo::adapt;
use indexmap::IndexSet;
use serde::Serialize;

use super::is_truthy;

/// Property columns shown in the all-features table
pub const MAX_PROPERTY_COLUMNS: usize = 5;

pub const NO_SELECTION_MESSAGE: &str =
    "No feature is currently selected. Click on a map feature to view its details.";

pub const NO_FEATURES_MESSAGE: &str = "No features available in the current map view.";

const NO_DESCRIPTION: &str = "No description available";

/// Shown for a property a feature does not carry
const MISSING_VALUE: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TableTab {
    Layers,
    Features,
    Feature,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSummaryRow {
    pub layer_id: LayerId,
    pub name: String,
    pub layer_type: LayerKind,
    pub feature_count: usize,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRow {
    pub layer_id: LayerId,
    pub layer_name: String,
    pub feature_index: usize,
    pub display_name: String,
    pub type_label: String,
    pub coordinates: String,
    /// One value per entry of [`DataTable::property_columns`]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyRow {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureDetail {
    pub reference: FeatureRef,
    pub title: String,
    pub layer_name: String,
    pub type_label: String,
    pub coordinates: String,
    pub properties: Vec<PropertyRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SelectedFeatureDetail {
    Feature(FeatureDetail),
    NoSelection { message: String },
}

impl SelectedFeatureDetail {
    pub fn no_selection() -> Self {
        SelectedFeatureDetail::NoSelection { message: NO_SELECTION_MESSAGE.to_string() }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, SelectedFeatureDetail::Feature(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataTable {
    pub layer_summaries: Vec<LayerSummaryRow>,
    pub property_columns: Vec<String>,
    pub all_features: Vec<FeatureRow>,
    pub selected_feature_detail: SelectedFeatureDetail,
    pub default_tab: TableTab,
}

impl DataTable {
    /// Message for the all-features tab when it has no rows
    pub fn empty_message(&self) -> Option<&'static str> {
        self.all_features.is_empty().then_some(NO_FEATURES_MESSAGE)
    }
}

/// Build the data table for the active layers and the (possibly stale)
/// selection.
pub fn data_table(active_layers: &[&Layer], selection: Option<&FeatureRef>) -> DataTable {
    let layer_summaries = active_layers
        .iter()
        .map(|layer| LayerSummaryRow {
            layer_id: layer.id.clone(),
            name: layer.name.clone(),
            layer_type: layer.kind(),
            feature_count: layer.features().len(),
            description: layer.description.clone().unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        })
        .collect();

    // Union of property keys in first-seen order
    let mut keys: IndexSet<&str> = IndexSet::new();
    for layer in active_layers {
        for feature in layer.features() {
            keys.extend(feature.properties.keys().map(String::as_str));
        }
    }
    let property_columns: Vec<String> =
        keys.into_iter().take(MAX_PROPERTY_COLUMNS).map(str::to_string).collect();

    let mut all_features = Vec::new();
    let mut selected = None;
    for layer in active_layers {
        for (feature_index, feature) in layer.features().iter().enumerate() {
            let row_number = all_features.len() + 1;
            let values = property_columns
                .iter()
                .map(|key| {
                    feature.property_text(key).unwrap_or_else(|| MISSING_VALUE.to_string())
                })
                .collect();
            let geometry = adapt(&feature.geometry);
            all_features.push(FeatureRow {
                layer_id: layer.id.clone(),
                layer_name: layer.name.clone(),
                feature_index,
                display_name: display_name(feature)
                    .unwrap_or_else(|| format!("Feature {}", row_number)),
                type_label: geometry.type_label,
                coordinates: geometry.coordinate_summary,
                values,
            });

            let is_selected = selection
                .is_some_and(|s| s.layer_id == layer.id && s.feature_index == feature_index);
            if is_selected {
                selected = Some(feature_detail(layer, feature_index, feature));
            }
        }
    }

    let (selected_feature_detail, default_tab) = match selected {
        Some(detail) => (SelectedFeatureDetail::Feature(detail), TableTab::Feature),
        None => (SelectedFeatureDetail::no_selection(), TableTab::Layers),
    };

    DataTable {
        layer_summaries,
        property_columns,
        all_features,
        selected_feature_detail,
        default_tab,
    }
}

fn feature_detail(layer: &Layer, feature_index: usize, feature: &Feature) -> FeatureDetail {
    let geometry = adapt(&feature.geometry);
    FeatureDetail {
        reference: FeatureRef::new(layer.id.clone(), feature_index),
        title: display_name(feature).unwrap_or_else(|| "Selected Feature".to_string()),
        layer_name: layer.name.clone(),
        type_label: geometry.type_label,
        coordinates: geometry.coordinate_summary,
        properties: property_rows(feature),
    }
}

/// `name`, else `id`, from the feature properties
pub(crate) fn display_name(feature: &Feature) -> Option<String> {
    ["name", "id"]
        .iter()
        .filter_map(|key| feature.properties.get(*key))
        .find(|value| is_truthy(value))
        .map(value_text)
}

pub(crate) fn property_rows(feature: &Feature) -> Vec<PropertyRow> {
    feature
        .properties
        .iter()
        .map(|(key, value)| PropertyRow { key: key.clone(), value: value_text(value) })
        .collect()
}
