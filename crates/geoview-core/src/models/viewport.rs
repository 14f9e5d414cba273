use serde::{Deserialize, Serialize};

/// Geographic coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for LatLng {
    /// Interprets the pair as `[lat, lng]`
    fn from(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

/// Axis-aligned geographic bounds. Used both for dataset extents and for the
/// derived visible area of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Bounds {
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self { north, south, east, west }
    }

    pub fn south_west(&self) -> LatLng {
        LatLng::new(self.south, self.west)
    }

    pub fn north_east(&self) -> LatLng {
        LatLng::new(self.north, self.east)
    }

    pub fn center(&self) -> LatLng {
        LatLng::new((self.north + self.south) / 2.0, (self.east + self.west) / 2.0)
    }

    /// True when the bounds collapse to a single point
    pub fn is_degenerate(&self) -> bool {
        self.north == self.south && self.east == self.west
    }

    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat <= self.north
            && point.lat >= self.south
            && point.lng <= self.east
            && point.lng >= self.west
    }
}

/// Size of the map surface in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// Inclusive zoom bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomRange {
    pub min: u8,
    pub max: u8,
}

impl ZoomRange {
    pub fn new(min: u8, max: u8) -> Self {
        Self { min: min.min(max), max: max.max(min) }
    }

    /// Clamp a possibly out-of-range level into the range
    pub fn clamp(&self, level: i32) -> u8 {
        level.clamp(self.min as i32, self.max as i32) as u8
    }
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self::new(0, 18)
    }
}

/// Authoritative viewport state. Bounds are not part of it; they are always
/// derived from center, zoom and the surface size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub center: LatLng,
    pub zoom: u8,
}

impl ViewportState {
    pub fn new(center: LatLng, zoom: u8) -> Self {
        Self { center, zoom }
    }
}
