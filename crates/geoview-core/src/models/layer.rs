//! Layers and the features they own.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

use super::geometry::Geometry;
use super::style::StyleSpec;
use super::viewport::{Bounds, LatLng};
use crate::error::{GeoviewError, Result};

/// Stable layer identifier. Backends send either strings or numbers; both are
/// normalized to their string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(pub String);

impl LayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Accepts a JSON string or number
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<u64> for LayerId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

/// Ordered `layer id -> active` map, the payload of layer toggle notifications
pub type ActivationMap = IndexMap<LayerId, bool>;

/// Weak reference to a feature: owning layer plus index within that layer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureRef {
    pub layer_id: LayerId,
    pub feature_index: usize,
}

impl FeatureRef {
    pub fn new(layer_id: impl Into<LayerId>, feature_index: usize) -> Self {
        Self { layer_id: layer_id.into(), feature_index }
    }
}

/// One geometry plus its attributes. Immutable once received.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<String>,
    pub geometry: Geometry,
    pub properties: Map<String, Value>,
}

impl Feature {
    pub fn new(geometry: Geometry, properties: Map<String, Value>) -> Self {
        Self { id: None, geometry, properties }
    }

    /// Parse a GeoJSON Feature object leniently
    pub fn from_geojson(value: &Value) -> Self {
        let geometry = Geometry::from_geojson(value.get("geometry").unwrap_or(&Value::Null));
        let properties = value
            .get("properties")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        let id = value.get("id").and_then(|id| match id {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });
        Self { id, geometry, properties }
    }

    /// Property value as display text; strings are unquoted
    pub fn property_text(&self, key: &str) -> Option<String> {
        self.properties.get(key).map(value_text)
    }
}

/// Render a JSON scalar the way a user expects to read it
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Layer kind as reported by the backend `type` member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    GeoJson,
    Marker,
    External,
}

impl LayerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::GeoJson => "geojson",
            LayerKind::Marker => "marker",
            LayerKind::External => "external",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a layer's geometry comes from
#[derive(Debug, Clone, PartialEq)]
pub enum GeometrySource {
    /// Inline feature collection
    Inline(Vec<Feature>),
    /// Single marker; `feature` is a synthetic Point at `position`
    Marker { position: LatLng, feature: Feature },
    /// Geometry served elsewhere (tiles, URLs); no features are known locally
    External { reference: String },
}

impl GeometrySource {
    /// Marker source at `position` (`[lat, lng]` order, as map libraries take it)
    pub fn marker(position: LatLng, name: &str) -> Self {
        let mut properties = Map::new();
        properties.insert("name".to_string(), Value::String(name.to_string()));
        let feature = Feature::new(Geometry::point(position.lng, position.lat), properties);
        GeometrySource::Marker { position, feature }
    }

    pub fn features(&self) -> &[Feature] {
        match self {
            GeometrySource::Inline(features) => features,
            GeometrySource::Marker { feature, .. } => std::slice::from_ref(feature),
            GeometrySource::External { .. } => &[],
        }
    }

    pub fn kind(&self) -> LayerKind {
        match self {
            GeometrySource::Inline(_) => LayerKind::GeoJson,
            GeometrySource::Marker { .. } => LayerKind::Marker,
            GeometrySource::External { .. } => LayerKind::External,
        }
    }
}

/// A named, independently toggleable collection of features with a style
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub source: GeometrySource,
    pub style: Option<StyleSpec>,
    pub active: bool,
    pub description: Option<String>,
    pub extent: Option<Bounds>,
    pub popup_content: Option<String>,
    pub dataset_id: Option<String>,
    pub analysis_id: Option<String>,
}

impl Layer {
    /// New inactive layer without style or metadata
    pub fn new(id: impl Into<LayerId>, name: impl Into<String>, source: GeometrySource) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            source,
            style: None,
            active: false,
            description: None,
            extent: None,
            popup_content: None,
            dataset_id: None,
            analysis_id: None,
        }
    }

    pub fn with_style(mut self, style: StyleSpec) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_extent(mut self, extent: Bounds) -> Self {
        self.extent = Some(extent);
        self
    }

    pub fn features(&self) -> &[Feature] {
        self.source.features()
    }

    pub fn kind(&self) -> LayerKind {
        self.source.kind()
    }

    /// Parse one backend layer descriptor. Returns None when the descriptor
    /// is not an object or carries no usable id.
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let id = LayerId::from_json(obj.get("id")?)?;
        let name = obj
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Layer {}", id));

        let declared = obj.get("type").and_then(Value::as_str);
        let data = obj.get("data").filter(|d| !d.is_null());
        let position = obj.get("position").and_then(parse_position);

        let source = match (declared, data, position) {
            (Some("marker"), _, Some(position)) | (None, None, Some(position)) => {
                GeometrySource::marker(position, &name)
            }
            (Some("geojson"), data, _) | (None, data @ Some(_), _) => {
                GeometrySource::Inline(data.map(parse_features).unwrap_or_default())
            }
            _ => GeometrySource::External {
                reference: obj
                    .get("url")
                    .and_then(Value::as_str)
                    .or(declared)
                    .unwrap_or_default()
                    .to_string(),
            },
        };

        let text = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);
        let ident = |key: &str| {
            obj.get(key).and_then(|v| LayerId::from_json(v)).map(|id| id.0)
        };

        Some(Self {
            style: obj.get("style").filter(|s| !s.is_null()).map(StyleSpec::from_json),
            active: false,
            description: text("description"),
            extent: obj.get("extent").and_then(parse_extent),
            popup_content: text("popupContent").or_else(|| text("popup_content")),
            dataset_id: ident("dataset_id"),
            analysis_id: ident("analysis_id"),
            id,
            name,
            source,
        })
    }
}

/// Parse a backend layer collection.
///
/// Fails only when the payload is not a JSON array. Malformed entries are
/// skipped and duplicate ids keep their first occurrence.
pub fn parse_layers(payload: &Value) -> Result<Vec<Layer>> {
    let entries = payload.as_array().ok_or_else(|| GeoviewError::LayerPayload {
        reason: format!("expected an array of layers, found {}", json_kind(payload)),
    })?;

    let mut seen = HashSet::new();
    let mut layers = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        match Layer::from_json(entry) {
            Some(layer) if seen.insert(layer.id.clone()) => layers.push(layer),
            Some(layer) => {
                tracing::warn!(layer_id = %layer.id, index, "Skipping duplicate layer id")
            }
            None => tracing::warn!(index, "Skipping malformed layer descriptor"),
        }
    }
    Ok(layers)
}

fn parse_features(data: &Value) -> Vec<Feature> {
    match data.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => data
            .get("features")
            .and_then(Value::as_array)
            .map(|features| features.iter().map(Feature::from_geojson).collect())
            .unwrap_or_default(),
        Some("Feature") => vec![Feature::from_geojson(data)],
        Some(_) => vec![Feature::new(Geometry::from_geojson(data), Map::new())],
        None => Vec::new(),
    }
}

fn parse_position(value: &Value) -> Option<LatLng> {
    let pair = value.as_array()?;
    let lat = pair.first()?.as_f64()?;
    let lng = pair.get(1)?.as_f64()?;
    Some(LatLng::new(lat, lng))
}

fn parse_extent(value: &Value) -> Option<Bounds> {
    let field = |key: &str| value.get(key).and_then(Value::as_f64);
    Some(Bounds::new(field("north")?, field("south")?, field("east")?, field("west")?))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
