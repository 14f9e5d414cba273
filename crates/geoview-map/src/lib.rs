//! GeoView Map - Layer composition and accessibility synchronization
//!
//! This crate keeps one source of truth for which layers are active and how
//! the viewport is positioned, and projects it into map paint, a legend, a
//! live description and a data table.

pub mod basemap;
pub mod keyboard;
pub mod projection;
pub mod registry;
pub mod selection;
pub mod session;
pub mod style;
pub mod viewport;

pub use basemap::{BaseLayer, BASE_LAYERS};
pub use keyboard::{Key, KeyOutcome, KeyboardAdapter, KEYBOARD_INSTRUCTIONS};
pub use projection::{
    data_table, describe, legend, legend_summary, popup, DataTable, LegendGroup, Popup,
    SelectedFeatureDetail, TableTab,
};
pub use registry::LayerRegistry;
pub use selection::{SelectionTracker, SelectionTrigger};
pub use session::{
    LoadTicket, MapSession, RenderFeature, RenderLayer, Snapshot, LOADING_MESSAGE,
    LOAD_FAILED_MESSAGE,
};
pub use style::{legend_entries, resolve, LegendEntry};
pub use viewport::{ViewportController, ViewportPhase};
