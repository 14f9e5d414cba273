//! Layer style specifications and paint parameters.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Color used when a style does not say otherwise
pub const DEFAULT_COLOR: &str = "#ccc";

/// Opacity used when a style does not say otherwise
pub const DEFAULT_OPACITY: f64 = 1.0;

/// Paint as declared in a style; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

impl Paint {
    /// Paint with only a color
    pub fn color(color: impl Into<String>) -> Self {
        Self { color: Some(color.into()), ..Default::default() }
    }

    /// Fill in defaults for everything left unspecified
    pub fn to_params(&self) -> PaintParams {
        PaintParams {
            color: self.color.clone().unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            opacity: self.opacity.unwrap_or(DEFAULT_OPACITY),
            weight: self.weight,
            radius: self.radius,
        }
    }

    /// Lenient parse of a JSON paint object; non-objects give an empty paint
    pub fn from_json(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };
        Self {
            color: obj.get("color").and_then(Value::as_str).map(str::to_string),
            opacity: obj.get("opacity").and_then(Value::as_f64),
            weight: obj.get("weight").and_then(Value::as_f64),
            radius: obj.get("radius").and_then(Value::as_f64),
        }
    }
}

/// Concrete paint handed to the rendering surface and the legend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaintParams {
    pub color: String,
    pub opacity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

impl Default for PaintParams {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR.to_string(),
            opacity: DEFAULT_OPACITY,
            weight: None,
            radius: None,
        }
    }
}

/// One stop of a gradient style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub value: f64,
    pub color: String,
}

/// Declarative description of how a layer's features are painted and legended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StyleSpec {
    Simple(Paint),
    Categorical {
        property: String,
        values: IndexMap<String, Paint>,
    },
    Gradient {
        property: String,
        stops: Vec<GradientStop>,
    },
}

impl StyleSpec {
    /// Simple style with a single color
    pub fn simple(color: impl Into<String>, opacity: f64) -> Self {
        StyleSpec::Simple(Paint {
            color: Some(color.into()),
            opacity: Some(opacity),
            ..Default::default()
        })
    }

    /// Lenient parse of a backend style object.
    ///
    /// Categorical and gradient styles that lack their `property` or their
    /// `values`/`stops` degrade to a simple style built from whatever top-level
    /// paint members are present.
    pub fn from_json(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return StyleSpec::Simple(Paint::default());
        };

        let kind = obj.get("type").and_then(Value::as_str);
        let property = obj.get("property").and_then(Value::as_str);

        match (kind, property) {
            (Some("categorical"), Some(property)) => {
                if let Some(values) = obj.get("values").and_then(Value::as_object) {
                    return StyleSpec::Categorical {
                        property: property.to_string(),
                        values: values
                            .iter()
                            .map(|(key, paint)| (key.clone(), Paint::from_json(paint)))
                            .collect(),
                    };
                }
            }
            (Some("gradient"), Some(property)) => {
                if let Some(stops) = obj.get("stops").and_then(Value::as_array) {
                    return StyleSpec::Gradient {
                        property: property.to_string(),
                        stops: stops.iter().filter_map(parse_stop).collect(),
                    };
                }
            }
            _ => {}
        }

        StyleSpec::Simple(Paint::from_json(value))
    }
}

fn parse_stop(value: &Value) -> Option<GradientStop> {
    let obj = value.as_object()?;
    let stop_value = match obj.get("value")? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    if !stop_value.is_finite() {
        return None;
    }
    let color = obj.get("color").and_then(Value::as_str).unwrap_or(DEFAULT_COLOR);
    Some(GradientStop { value: stop_value, color: color.to_string() })
}
