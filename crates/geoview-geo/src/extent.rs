//! Layer extents and fit-to-bounds zoom.

use geo::{BoundingRect, Geometry as GeoGeometry};
use geoview_core::models::{Bounds, Feature, Geometry, Position, ViewportSize, ZoomRange};

use crate::mercator;

/// Pixels kept free on each side when fitting an extent into the viewport
pub const FIT_PADDING: f64 = 20.0;

/// Convert a feature geometry to a `geo` geometry. Unknown and missing
/// geometries have no counterpart.
pub fn to_geo_geometry(geom: &Geometry) -> Option<GeoGeometry> {
    Some(match geom {
        Geometry::Point { coordinates } => {
            GeoGeometry::Point(geo::Point::new(coordinates[0], coordinates[1]))
        }
        Geometry::LineString { coordinates } => GeoGeometry::LineString(line(coordinates)),
        Geometry::Polygon { coordinates } => GeoGeometry::Polygon(polygon(coordinates)),
        Geometry::MultiPoint { coordinates } => GeoGeometry::MultiPoint(geo::MultiPoint::new(
            coordinates.iter().map(|c| geo::Point::new(c[0], c[1])).collect(),
        )),
        Geometry::MultiLineString { coordinates } => GeoGeometry::MultiLineString(
            geo::MultiLineString::new(coordinates.iter().map(|l| line(l)).collect()),
        ),
        Geometry::MultiPolygon { coordinates } => GeoGeometry::MultiPolygon(
            geo::MultiPolygon::new(coordinates.iter().map(|p| polygon(p)).collect()),
        ),
        Geometry::GeometryCollection { geometries } => {
            GeoGeometry::GeometryCollection(geo::GeometryCollection::from(
                geometries.iter().filter_map(to_geo_geometry).collect::<Vec<_>>(),
            ))
        }
        Geometry::Unknown { .. } | Geometry::Missing => return None,
    })
}

fn line(coords: &[Position]) -> geo::LineString {
    geo::LineString::new(coords.iter().map(|c| geo::Coord { x: c[0], y: c[1] }).collect())
}

fn polygon(rings: &[Vec<Position>]) -> geo::Polygon {
    let mut rings = rings.iter().map(|r| line(r));
    let exterior = rings.next().unwrap_or_else(|| geo::LineString::new(vec![]));
    geo::Polygon::new(exterior, rings.collect())
}

/// Bounding extent of every drawable feature, or None when there is nothing
/// to bound
pub fn bounding_extent(features: &[Feature]) -> Option<Bounds> {
    let mut extent: Option<geo::Rect> = None;
    for feature in features {
        let Some(rect) = to_geo_geometry(&feature.geometry).and_then(|g| g.bounding_rect()) else {
            continue;
        };
        extent = Some(match extent {
            None => rect,
            Some(acc) => geo::Rect::new(
                geo::Coord { x: acc.min().x.min(rect.min().x), y: acc.min().y.min(rect.min().y) },
                geo::Coord { x: acc.max().x.max(rect.max().x), y: acc.max().y.max(rect.max().y) },
            ),
        });
    }
    extent.map(|r| Bounds::new(r.max().y, r.min().y, r.max().x, r.min().x))
}

/// Largest integer zoom at which `extent` fits inside the padded viewport,
/// clamped to `range`. Returns None for a degenerate extent, leaving the
/// caller to use its default zoom.
pub fn fit_zoom(extent: &Bounds, size: ViewportSize, range: ZoomRange) -> Option<u8> {
    if extent.is_degenerate() {
        tracing::debug!(
            north = extent.north,
            east = extent.east,
            "Extent is a single point, no fit"
        );
        return None;
    }
    let avail_w = (size.width as f64 - 2.0 * FIT_PADDING).max(1.0);
    let avail_h = (size.height as f64 - 2.0 * FIT_PADDING).max(1.0);

    let mut best = range.min;
    for zoom in range.min..=range.max {
        let (x1, y1) = mercator::project(extent.north_east(), zoom);
        let (x0, y0) = mercator::project(extent.south_west(), zoom);
        if (x1 - x0).abs() <= avail_w && (y0 - y1).abs() <= avail_h {
            best = zoom;
        } else {
            break;
        }
    }
    tracing::debug!(zoom = best, "Fitted extent");
    Some(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn feature(geometry: Geometry) -> Feature {
        Feature::new(geometry, Map::new())
    }

    #[test]
    fn test_bounding_extent_spans_all_features() {
        let features = vec![
            feature(Geometry::point(-74.01, 40.71)),
            feature(Geometry::line_string(vec![[-74.02, 40.70], [-74.00, 40.72]])),
            feature(Geometry::Missing),
        ];
        let extent = bounding_extent(&features).unwrap();
        assert_eq!(extent, Bounds::new(40.72, 40.70, -74.00, -74.02));
    }

    #[test]
    fn test_bounding_extent_empty() {
        assert!(bounding_extent(&[]).is_none());
        assert!(bounding_extent(&[feature(Geometry::unknown("Curve"))]).is_none());
    }

    #[test]
    fn test_fit_zoom_degenerate_extent() {
        let point = Bounds::new(40.71, 40.71, -74.0, -74.0);
        assert_eq!(fit_zoom(&point, ViewportSize::default(), ZoomRange::default()), None);
    }

    #[test]
    fn test_fit_zoom_neighbourhood() {
        let extent = Bounds::new(40.72, 40.70, -74.00, -74.02);
        let zoom = fit_zoom(&extent, ViewportSize::new(800, 600), ZoomRange::default()).unwrap();
        // ~0.02 degrees fits at 14 on an 800x600 surface but not at 15
        assert_eq!(zoom, 14);
    }

    #[test]
    fn test_fit_zoom_clamped_to_range() {
        let world = Bounds::new(80.0, -80.0, 179.0, -179.0);
        assert_eq!(fit_zoom(&world, ViewportSize::new(800, 600), ZoomRange::new(3, 18)), Some(3));

        let tiny = Bounds::new(40.7101, 40.7100, -74.0000, -74.0001);
        assert_eq!(fit_zoom(&tiny, ViewportSize::new(800, 600), ZoomRange::new(0, 16)), Some(16));
    }
}
