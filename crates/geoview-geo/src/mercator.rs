//! Spherical Web-Mercator math on 256px tiles.
//!
//! World pixel space at zoom `z` is a square of `256 * 2^z` pixels with the
//! origin at the north-west corner; +y points south.

use std::f64::consts::PI;

use geoview_core::models::{Bounds, LatLng, ViewportSize};

pub const TILE_SIZE: f64 = 256.0;

/// Latitude limit of the square Mercator world
pub const MAX_LATITUDE: f64 = 85.0511287798;

/// Side length of the world in pixels at the given zoom
pub fn world_size(zoom: u8) -> f64 {
    TILE_SIZE * 2f64.powi(zoom as i32)
}

/// Project a coordinate to world pixel coordinates `(x, y)`
pub fn project(point: LatLng, zoom: u8) -> (f64, f64) {
    let size = world_size(zoom);
    let lat = clamp_lat(point.lat).to_radians();
    let x = (point.lng + 180.0) / 360.0 * size;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;
    (x, y)
}

/// Inverse of [`project`]
pub fn unproject(x: f64, y: f64, zoom: u8) -> LatLng {
    let size = world_size(zoom);
    let lng = x / size * 360.0 - 180.0;
    let n = PI * (1.0 - 2.0 * y / size);
    let lat = n.sinh().atan().to_degrees();
    LatLng::new(lat, lng)
}

pub fn clamp_lat(lat: f64) -> f64 {
    lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
}

/// Wrap a longitude into [-180, 180)
pub fn wrap_lng(lng: f64) -> f64 {
    if (-180.0..180.0).contains(&lng) {
        return lng;
    }
    let wrapped = (lng + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped >= 180.0 {
        -180.0
    } else {
        wrapped
    }
}

/// Move a center by a screen pixel delta. +dx is east, +dy is south.
pub fn offset(center: LatLng, zoom: u8, dx: f64, dy: f64) -> LatLng {
    let (x, y) = project(center, zoom);
    let moved = unproject(x + dx, y + dy, zoom);
    LatLng::new(clamp_lat(moved.lat), wrap_lng(moved.lng))
}

/// Geographic area visible in a viewport of `size` pixels centered on
/// `center`. Longitudes are not wrapped so a view straddling the antimeridian
/// keeps `west < east`.
pub fn visible_bounds(center: LatLng, zoom: u8, size: ViewportSize) -> Bounds {
    let (cx, cy) = project(center, zoom);
    let half_w = size.width as f64 / 2.0;
    let half_h = size.height as f64 / 2.0;
    let south_west = unproject(cx - half_w, cy + half_h, zoom);
    let north_east = unproject(cx + half_w, cy - half_h, zoom);
    Bounds::new(north_east.lat, south_west.lat, north_east.lng, south_west.lng)
}
