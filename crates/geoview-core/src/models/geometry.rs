//! Canonical geometry types used across all geoview crates.
//!
//! Geometry arrives as loosely-typed GeoJSON from the backend. Parsing never
//! fails: anything that is not a well-formed GeoJSON geometry becomes
//! [`Geometry::Unknown`] (or [`Geometry::Missing`] when absent) so that every
//! projection can still show degraded information.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A GeoJSON position, `[lng, lat]`
pub type Position = [f64; 2];

/// Geometry type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
    Unknown,
    Missing,
}

impl GeometryType {
    /// The GeoJSON `type` member for this geometry type
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::LineString => "LineString",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::MultiLineString => "MultiLineString",
            GeometryType::MultiPolygon => "MultiPolygon",
            GeometryType::GeometryCollection => "GeometryCollection",
            GeometryType::Unknown => "Unknown",
            GeometryType::Missing => "Missing",
        }
    }
}

/// GeoJSON-compatible geometry representation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: Position,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<Geometry>,
    },
    /// Unrecognized or malformed geometry; `kind` is the declared `type`, if any
    #[serde(skip)]
    Unknown { kind: String },
    /// Feature without geometry
    #[serde(skip)]
    Missing,
}

impl Geometry {
    /// Create a Point geometry from `lng`, `lat`
    pub fn point(lng: f64, lat: f64) -> Self {
        Geometry::Point { coordinates: [lng, lat] }
    }

    /// Create a LineString geometry
    pub fn line_string(coords: Vec<Position>) -> Self {
        Geometry::LineString { coordinates: coords }
    }

    /// Create a Polygon geometry
    pub fn polygon(rings: Vec<Vec<Position>>) -> Self {
        Geometry::Polygon { coordinates: rings }
    }

    /// Create an Unknown geometry with the given declared type
    pub fn unknown(kind: impl Into<String>) -> Self {
        Geometry::Unknown { kind: kind.into() }
    }

    /// Get the geometry type
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point { .. } => GeometryType::Point,
            Geometry::LineString { .. } => GeometryType::LineString,
            Geometry::Polygon { .. } => GeometryType::Polygon,
            Geometry::MultiPoint { .. } => GeometryType::MultiPoint,
            Geometry::MultiLineString { .. } => GeometryType::MultiLineString,
            Geometry::MultiPolygon { .. } => GeometryType::MultiPolygon,
            Geometry::GeometryCollection { .. } => GeometryType::GeometryCollection,
            Geometry::Unknown { .. } => GeometryType::Unknown,
            Geometry::Missing => GeometryType::Missing,
        }
    }

    /// Parse from a GeoJSON geometry object. Never fails.
    pub fn from_geojson(value: &Value) -> Self {
        let kind = match value {
            Value::Null => return Geometry::Missing,
            Value::Object(obj) => obj.get("type").and_then(Value::as_str).unwrap_or_default(),
            _ => return Geometry::unknown(""),
        };

        match serde_json::from_value::<RawGeometry>(value.clone()) {
            Ok(raw) => raw.into_geometry().unwrap_or_else(|| Geometry::unknown(kind)),
            Err(_) => Geometry::unknown(kind),
        }
    }

    /// Convert to serde_json::Value (GeoJSON); Null for Unknown and Missing
    pub fn to_geojson(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Iterate every position in the geometry
    pub fn positions(&self) -> Box<dyn Iterator<Item = &Position> + '_> {
        match self {
            Geometry::Point { coordinates } => Box::new(std::iter::once(coordinates)),
            Geometry::LineString { coordinates } | Geometry::MultiPoint { coordinates } => {
                Box::new(coordinates.iter())
            }
            Geometry::Polygon { coordinates } | Geometry::MultiLineString { coordinates } => {
                Box::new(coordinates.iter().flatten())
            }
            Geometry::MultiPolygon { coordinates } => {
                Box::new(coordinates.iter().flatten().flatten())
            }
            Geometry::GeometryCollection { geometries } => {
                Box::new(geometries.iter().flat_map(|g| g.positions()))
            }
            Geometry::Unknown { .. } | Geometry::Missing => Box::new(std::iter::empty()),
        }
    }
}

/// Wire form accepting positions with optional altitude
#[derive(Deserialize)]
#[serde(tag = "type")]
enum RawGeometry {
    Point { coordinates: Vec<f64> },
    LineString { coordinates: Vec<Vec<f64>> },
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPoint { coordinates: Vec<Vec<f64>> },
    MultiLineString { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
    GeometryCollection { geometries: Vec<Value> },
}

impl RawGeometry {
    fn into_geometry(self) -> Option<Geometry> {
        Some(match self {
            RawGeometry::Point { coordinates } => {
                Geometry::Point { coordinates: position(&coordinates)? }
            }
            RawGeometry::LineString { coordinates } => {
                Geometry::LineString { coordinates: positions(&coordinates)? }
            }
            RawGeometry::Polygon { coordinates } => {
                Geometry::Polygon { coordinates: rings(&coordinates)? }
            }
            RawGeometry::MultiPoint { coordinates } => {
                Geometry::MultiPoint { coordinates: positions(&coordinates)? }
            }
            RawGeometry::MultiLineString { coordinates } => {
                Geometry::MultiLineString { coordinates: rings(&coordinates)? }
            }
            RawGeometry::MultiPolygon { coordinates } => Geometry::MultiPolygon {
                coordinates: coordinates.iter().map(|p| rings(p)).collect::<Option<_>>()?,
            },
            RawGeometry::GeometryCollection { geometries } => Geometry::GeometryCollection {
                geometries: geometries.iter().map(Geometry::from_geojson).collect(),
            },
        })
    }
}

fn position(raw: &[f64]) -> Option<Position> {
    match raw {
        [lng, lat, ..] if lng.is_finite() && lat.is_finite() => Some([*lng, *lat]),
        _ => None,
    }
}

fn positions(raw: &[Vec<f64>]) -> Option<Vec<Position>> {
    raw.iter().map(|p| position(p)).collect()
}

fn rings(raw: &[Vec<Vec<f64>>]) -> Option<Vec<Vec<Position>>> {
    raw.iter().map(|r| positions(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_geometry_serialization() {
        let point = Geometry::point(-74.005, 40.715);
        let json = serde_json::to_string(&point).unwrap();
        assert!(json.contains("Point"));
        assert!(json.contains("-74.005"));
    }

    #[test]
    fn test_parse_polygon() {
        let value = json!({
            "type": "Polygon",
            "coordinates": [[[-74.01, 40.71], [-74.01, 40.72], [-74.0, 40.72], [-74.01, 40.71]]]
        });
        let geom = Geometry::from_geojson(&value);
        assert_eq!(geom.geometry_type(), GeometryType::Polygon);
        assert_eq!(geom.positions().count(), 4);
    }

    #[test]
    fn test_altitude_is_dropped() {
        let geom =
            Geometry::from_geojson(&json!({"type": "Point", "coordinates": [1.0, 2.0, 30.0]}));
        assert_eq!(geom, Geometry::point(1.0, 2.0));
    }

    #[test]
    fn test_unknown_type_degrades() {
        let geom = Geometry::from_geojson(&json!({"type": "CircularString", "coordinates": []}));
        assert_eq!(geom, Geometry::unknown("CircularString"));
    }

    #[test]
    fn test_malformed_coordinates_degrade() {
        let geom = Geometry::from_geojson(&json!({"type": "Point", "coordinates": [1.0]}));
        assert_eq!(geom, Geometry::unknown("Point"));

        let geom = Geometry::from_geojson(&json!({"type": "LineString", "coordinates": "nope"}));
        assert_eq!(geom, Geometry::unknown("LineString"));
    }

    #[test]
    fn test_missing_geometry() {
        assert_eq!(Geometry::from_geojson(&Value::Null), Geometry::Missing);
        assert_eq!(Geometry::from_geojson(&json!(42)), Geometry::unknown(""));
        assert_eq!(Geometry::Missing.to_geojson(), Value::Null);
    }

    #[test]
    fn test_collection_members_parse_independently() {
        let geom = Geometry::from_geojson(&json!({
            "type": "GeometryCollection",
            "geometries": [
                {"type": "Point", "coordinates": [0.0, 0.0]},
                {"type": "Bogus"}
            ]
        }));
        match geom {
            Geometry::GeometryCollection { geometries } => {
                assert_eq!(geometries[0], Geometry::point(0.0, 0.0));
                assert_eq!(geometries[1], Geometry::unknown("Bogus"));
            }
            other => panic!("Expected GeometryCollection, got {:?}", other),
        }
    }
}
