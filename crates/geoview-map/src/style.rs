//! Style resolution: paint per feature and legend entries per style.

use geoview_core::models::{Feature, Layer, PaintParams, StyleSpec};
use serde::Serialize;
use serde_json::Value;

/// One legend row: label plus the swatch it is drawn with
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub swatch: PaintParams,
}

/// Paint for one feature under a style.
///
/// Unmatched categories and missing or non-numeric gradient values fall back
/// to the default paint.
pub fn resolve(style: &StyleSpec, feature: &Feature) -> PaintParams {
    match style {
        StyleSpec::Simple(paint) => paint.to_params(),
        StyleSpec::Categorical { property, values } => feature
            .properties
            .get(property)
            .and_then(category_key)
            .and_then(|key| values.get(&key))
            .map(|paint| paint.to_params())
            .unwrap_or_default(),
        StyleSpec::Gradient { property, stops } => {
            let Some(value) = feature.properties.get(property).and_then(numeric) else {
                return PaintParams::default();
            };
            // Stops keep declaration order for the legend, so search by value
            let stop = stops
                .iter()
                .filter(|s| s.value <= value)
                .max_by(|a, b| a.value.total_cmp(&b.value))
                .or_else(|| stops.iter().min_by(|a, b| a.value.total_cmp(&b.value)));
            match stop {
                Some(stop) => PaintParams { color: stop.color.clone(), ..Default::default() },
                None => PaintParams::default(),
            }
        }
    }
}

/// Paint for a feature of `layer`; unstyled layers use the default paint
pub fn resolve_for_layer(layer: &Layer, feature: &Feature) -> PaintParams {
    layer.style.as_ref().map(|style| resolve(style, feature)).unwrap_or_default()
}

/// Legend entries in declaration order. A simple style yields a single entry
/// labelled `layer_name`.
pub fn legend_entries(style: &StyleSpec, layer_name: &str) -> Vec<LegendEntry> {
    match style {
        StyleSpec::Simple(paint) => {
            vec![LegendEntry { label: layer_name.to_string(), swatch: paint.to_params() }]
        }
        StyleSpec::Categorical { values, .. } => values
            .iter()
            .map(|(label, paint)| LegendEntry { label: label.clone(), swatch: paint.to_params() })
            .collect(),
        StyleSpec::Gradient { stops, .. } => stops
            .iter()
            .map(|stop| LegendEntry {
                label: stop.value.to_string(),
                swatch: PaintParams { color: stop.color.clone(), ..Default::default() },
            })
            .collect(),
    }
}

/// Categorical lookup key: strings as-is, numbers and booleans stringified
fn category_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn numeric(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}
