use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::Result;

/// Which layer collection to load
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", content = "id", rename_all = "lowercase")]
pub enum LayerTarget {
    /// Layers of one uploaded dataset
    Dataset(String),
    /// Output layers of one analysis run
    Analysis(String),
    /// Every available layer, unscoped
    All,
}

impl LayerTarget {
    /// Endpoint path relative to the API base URL
    pub fn path(&self) -> String {
        match self {
            LayerTarget::Dataset(id) => format!("/data/datasets/{}/layers", id),
            LayerTarget::Analysis(id) => format!("/analysis/{}/layers", id),
            LayerTarget::All => "/data/layers".to_string(),
        }
    }
}

impl fmt::Display for LayerTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerTarget::Dataset(id) => write!(f, "dataset {}", id),
            LayerTarget::Analysis(id) => write!(f, "analysis {}", id),
            LayerTarget::All => f.write_str("all layers"),
        }
    }
}

/// Port for fetching layer descriptors from a backend
///
/// Implementations return the raw JSON payload; interpretation (and lenient
/// handling of malformed entries) belongs to the layer registry.
#[async_trait]
pub trait LayerSource: Send + Sync {
    /// Fetch the layer collection for `target`
    async fn fetch_layers(&self, target: &LayerTarget) -> Result<Value>;

    /// Human-readable name of the source, for logs and status output
    fn source_name(&self) -> &str;
}
