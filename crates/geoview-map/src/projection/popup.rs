use geoview_core::models::{value_text, GeometrySource, Layer};
use geoview_geo::{adapt, format_pair, type_label};
use serde::Serialize;

use super::is_truthy;
use super::table::{property_rows, PropertyRow};

/// Popup content for one feature
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub title: String,
    /// Free text under the title; marker layers only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub properties: Vec<PropertyRow>,
    pub type_label: String,
    pub coordinates: String,
}

/// Popup for feature `feature_index` of `layer`, or None when the index is
/// out of range
pub fn popup(layer: &Layer, feature_index: usize) -> Option<Popup> {
    let feature = layer.features().get(feature_index)?;

    if let GeometrySource::Marker { position, .. } = &layer.source {
        let title = if layer.name.is_empty() { "Location".to_string() } else { layer.name.clone() };
        return Some(Popup {
            title,
            body: Some(
                layer.popup_content.clone().unwrap_or_else(|| "Point of interest".to_string()),
            ),
            properties: Vec::new(),
            type_label: type_label(&feature.geometry),
            coordinates: format_pair(*position),
        });
    }

    let title = feature
        .properties
        .get("name")
        .filter(|v| is_truthy(v))
        .map(value_text)
        .unwrap_or_else(|| "Feature Details".to_string());

    let geometry = adapt(&feature.geometry);
    Some(Popup {
        title,
        body: None,
        properties: property_rows(feature),
        type_label: geometry.type_label,
        coordinates: geometry.coordinate_summary,
    })
}
