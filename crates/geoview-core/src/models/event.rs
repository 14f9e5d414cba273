//! Events the engine hands to its host.
//!
//! The engine never touches a document or a live region itself; it queues
//! these and the hosting UI routes them.

use serde::{Deserialize, Serialize};

use super::layer::{ActivationMap, FeatureRef};
use super::viewport::{Bounds, LatLng};

/// Text for the host's polite live region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub message: String,
}

impl Announcement {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Payload of a completed pan/zoom
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapMove {
    pub center: LatLng,
    pub zoom: u8,
    pub bounds: Bounds,
}

/// Notifications emitted after state changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum MapEvent {
    /// A pan or zoom completed
    MapMoved(MapMove),
    /// Layer activation changed (or was re-asserted)
    LayerToggled(ActivationMap),
    /// Live-region text
    Announce(Announcement),
    /// Selected feature changed; None when cleared
    SelectionChanged(Option<FeatureRef>),
    /// User-visible status line, e.g. load failures
    Status(String),
}
