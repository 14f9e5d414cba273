//! GeoView Core - Domain models, configuration, and ports
//!
//! This crate contains the layer, feature, style and viewport models shared by
//! every geoview crate, plus the port definitions adapters implement.

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

pub use error::{GeoviewError, Result};
