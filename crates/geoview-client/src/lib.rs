//! GeoView Client - Layer source adapters
//!
//! Implementations of the `LayerSource` port for the backend HTTP API and for
//! local JSON files, plus the loader that feeds their results into a map
//! session while discarding stale responses.

pub mod file;
pub mod http;
pub mod loader;

pub use file::FileLayerSource;
pub use http::HttpLayerSource;
pub use loader::{fetch_for_ticket, load_layers};
