//! Geometry feature adapter.
//!
//! Produces, for any geometry, a render-ready shape for the map surface, a
//! human-readable type label and a compact coordinate summary. None of these
//! functions fail: unsupported or malformed input yields degraded text and no
//! shape.

use geoview_core::models::{Geometry, LatLng, Position};
use serde::Serialize;

use crate::format::{format_coord, format_lat_lng};

/// Uniform descriptor consumed by the map, legend, popup and table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdaptedGeometry {
    /// Shape for the rendering surface; None when nothing can be drawn
    pub shape: Option<geojson::Geometry>,
    pub type_label: String,
    pub coordinate_summary: String,
}

/// Adapt a geometry into all three representations
pub fn adapt(geometry: &Geometry) -> AdaptedGeometry {
    AdaptedGeometry {
        shape: render_shape(geometry),
        type_label: type_label(geometry),
        coordinate_summary: coordinate_summary(geometry),
    }
}

/// Human-readable geometry type
pub fn type_label(geometry: &Geometry) -> String {
    match geometry {
        Geometry::Point { .. } => "Point".to_string(),
        Geometry::LineString { .. } => "Line".to_string(),
        Geometry::Polygon { .. } => "Polygon".to_string(),
        Geometry::MultiPoint { .. } => "Multiple Points".to_string(),
        Geometry::MultiLineString { .. } => "Multiple Lines".to_string(),
        Geometry::MultiPolygon { .. } => "Multiple Polygons".to_string(),
        Geometry::GeometryCollection { .. } => "Geometry Collection".to_string(),
        Geometry::Unknown { kind } => complex(kind),
        Geometry::Missing => "Unknown".to_string(),
    }
}

/// Compact coordinate description at 4 decimal places
pub fn coordinate_summary(geometry: &Geometry) -> String {
    match geometry {
        Geometry::Point { coordinates } => format_lat_lng(lat_lng(coordinates)),
        Geometry::LineString { coordinates } if !coordinates.is_empty() => {
            let start = lat_lng(&coordinates[0]);
            format!(
                "{} points, starting at Lat: {}, Lng: {}",
                coordinates.len(),
                format_coord(start.lat),
                format_coord(start.lng)
            )
        }
        Geometry::Polygon { coordinates } if !coordinates.is_empty() => {
            format!("Polygon with {} vertices", coordinates[0].len())
        }
        Geometry::Unknown { kind } => complex(kind),
        Geometry::Missing => "No coordinates".to_string(),
        other => complex(other.geometry_type().as_str()),
    }
}

/// GeoJSON shape for the rendering surface
pub fn render_shape(geometry: &Geometry) -> Option<geojson::Geometry> {
    shape_value(geometry).map(geojson::Geometry::new)
}

fn shape_value(geometry: &Geometry) -> Option<geojson::Value> {
    Some(match geometry {
        Geometry::Point { coordinates } => geojson::Value::Point(coordinates.to_vec()),
        Geometry::LineString { coordinates } => geojson::Value::LineString(line(coordinates)),
        Geometry::Polygon { coordinates } => geojson::Value::Polygon(polygon(coordinates)),
        Geometry::MultiPoint { coordinates } => geojson::Value::MultiPoint(line(coordinates)),
        Geometry::MultiLineString { coordinates } => {
            geojson::Value::MultiLineString(polygon(coordinates))
        }
        Geometry::MultiPolygon { coordinates } => {
            geojson::Value::MultiPolygon(coordinates.iter().map(|p| polygon(p)).collect())
        }
        Geometry::GeometryCollection { geometries } => geojson::Value::GeometryCollection(
            geometries.iter().filter_map(render_shape).collect(),
        ),
        Geometry::Unknown { .. } | Geometry::Missing => return None,
    })
}

fn line(coords: &[Position]) -> Vec<Vec<f64>> {
    coords.iter().map(|c| c.to_vec()).collect()
}

fn polygon(rings: &[Vec<Position>]) -> Vec<Vec<Vec<f64>>> {
    rings.iter().map(|r| line(r)).collect()
}

fn lat_lng(position: &Position) -> LatLng {
    LatLng::new(position[1], position[0])
}

fn complex(kind: &str) -> String {
    if kind.is_empty() {
        "Complex geometry".to_string()
    } else {
        format!("Complex {} geometry", kind)
    }
}
