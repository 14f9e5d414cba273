pub mod event;
pub mod geometry;
pub mod layer;
pub mod style;
pub mod viewport;

pub use event::{Announcement, MapEvent, MapMove};
pub use geometry::{Geometry, GeometryType, Position};
pub use layer::{
    parse_layers, value_text, ActivationMap, Feature, FeatureRef, GeometrySource, Layer, LayerId,
    LayerKind,
};
pub use style::{GradientStop, Paint, PaintParams, StyleSpec, DEFAULT_COLOR, DEFAULT_OPACITY};
pub use viewport::{Bounds, LatLng, ViewportSize, ViewportState, ZoomRange};
