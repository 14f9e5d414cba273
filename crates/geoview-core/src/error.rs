//! Error types for GeoView

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoviewError {
    // Upstream layer errors
    #[error("Failed to fetch layers for {target}: {reason}")]
    LayerFetch { target: String, reason: String },

    #[error("Malformed layer payload: {reason}")]
    LayerPayload { reason: String },

    #[error("Layer not found: {id}")]
    LayerNotFound { id: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for GeoviewError {
    fn from(err: serde_json::Error) -> Self {
        GeoviewError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GeoviewError>;
