//! Viewport controller.
//!
//! Pan and zoom commands move the controller out of `Idle`; `move_end`
//! returns it to `Idle` and reports the completed move exactly once. Bounds
//! are always derived, never stored.

use geoview_core::models::{Bounds, LatLng, MapMove, ViewportSize, ViewportState, ZoomRange};
use geoview_geo::{fit_zoom, mercator};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewportPhase {
    #[default]
    Idle,
    Panning,
    Zooming,
}

#[derive(Debug, Clone)]
pub struct ViewportController {
    state: ViewportState,
    size: ViewportSize,
    zoom_range: ZoomRange,
    phase: ViewportPhase,
}

impl ViewportController {
    pub fn new(initial: ViewportState, size: ViewportSize, zoom_range: ZoomRange) -> Self {
        let center = LatLng::new(
            mercator::clamp_lat(initial.center.lat),
            mercator::wrap_lng(initial.center.lng),
        );
        let zoom = zoom_range.clamp(initial.zoom as i32);
        Self {
            state: ViewportState::new(center, zoom),
            size,
            zoom_range,
            phase: ViewportPhase::Idle,
        }
    }

    /// Pan by a screen pixel delta; +dy moves the view south
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.state.center = mercator::offset(self.state.center, self.state.zoom, dx, dy);
        if self.phase == ViewportPhase::Idle {
            self.phase = ViewportPhase::Panning;
        }
        tracing::debug!(dx, dy, lat = self.state.center.lat, lng = self.state.center.lng, "Pan");
    }

    /// Set the zoom level, clamped to the configured range
    pub fn set_zoom(&mut self, level: i32) {
        self.state.zoom = self.zoom_range.clamp(level);
        self.phase = ViewportPhase::Zooming;
        tracing::debug!(requested = level, zoom = self.state.zoom, "Zoom");
    }

    /// Absolute reset of center and zoom
    pub fn set_view(&mut self, center: LatLng, zoom: i32) {
        self.state.center =
            LatLng::new(mercator::clamp_lat(center.lat), mercator::wrap_lng(center.lng));
        self.state.zoom = self.zoom_range.clamp(zoom);
        self.phase = ViewportPhase::Zooming;
    }

    /// Center on `extent` at the largest zoom that shows all of it. A
    /// degenerate extent is centered at `fallback_zoom`.
    pub fn fit_bounds(&mut self, extent: &Bounds, fallback_zoom: u8) {
        let zoom = fit_zoom(extent, self.size, self.zoom_range).unwrap_or(fallback_zoom);
        self.set_view(extent.center(), zoom as i32);
    }

    /// Finish the pending interaction. Returns the completed move, or None
    /// when nothing was in progress.
    pub fn move_end(&mut self) -> Option<MapMove> {
        if self.phase == ViewportPhase::Idle {
            return None;
        }
        self.phase = ViewportPhase::Idle;
        Some(self.current_move())
    }

    /// Center, zoom and derived bounds as they stand now
    pub fn current_move(&self) -> MapMove {
        MapMove { center: self.state.center, zoom: self.state.zoom, bounds: self.bounds() }
    }

    pub fn bounds(&self) -> Bounds {
        mercator::visible_bounds(self.state.center, self.state.zoom, self.size)
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn phase(&self) -> ViewportPhase {
        self.phase
    }

    pub fn size(&self) -> ViewportSize {
        self.size
    }

    pub fn zoom_range(&self) -> ZoomRange {
        self.zoom_range
    }
}
