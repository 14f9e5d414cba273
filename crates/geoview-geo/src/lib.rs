//! GeoView Geo - Geometry adaptation and projection math
//!
//! This crate turns heterogeneous feature geometry into the uniform
//! descriptors every projection consumes, and owns the Web-Mercator math used
//! for viewport bounds, panning and fit-to-bounds.

pub mod adapter;
pub mod extent;
pub mod format;
pub mod mercator;

pub use adapter::{adapt, render_shape, type_label, AdaptedGeometry};
pub use extent::{bounding_extent, fit_zoom, to_geo_geometry};
pub use format::{format_coord, format_lat_lng, format_pair};
