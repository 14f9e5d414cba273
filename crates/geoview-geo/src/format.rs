//! Coordinate formatting shared by popups, legend and data table.
//!
//! Everything is shown at 4 decimal places (~11m).

use geoview_core::models::LatLng;

/// Decimal places used for every displayed coordinate
pub const COORD_PRECISION: usize = 4;

pub fn format_coord(value: f64) -> String {
    format!("{:.*}", COORD_PRECISION, value)
}

/// `Lat: 40.7150, Lng: -74.0050`
pub fn format_lat_lng(point: LatLng) -> String {
    format!("Lat: {}, Lng: {}", format_coord(point.lat), format_coord(point.lng))
}

/// `40.7150, -74.0050`
pub fn format_pair(point: LatLng) -> String {
    format!("{}, {}", format_coord(point.lat), format_coord(point.lng))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_decimal_places() {
        assert_eq!(format_coord(40.7), "40.7000");
        assert_eq!(format_coord(-74.00549), "-74.0055");
        assert_eq!(format_lat_lng(LatLng::new(40.715, -74.005)), "Lat: 40.7150, Lng: -74.0050");
        assert_eq!(format_pair(LatLng::new(1.0, 2.0)), "1.0000, 2.0000");
    }
}
