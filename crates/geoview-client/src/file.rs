use std::path::{Path, PathBuf};

use async_trait::async_trait;
use geoview_core::error::{GeoviewError, Result};
use geoview_core::ports::{LayerSource, LayerTarget};
use serde_json::Value;

/// Layer source reading a JSON layer collection from disk. The same file
/// answers every target.
pub struct FileLayerSource {
    path: PathBuf,
    name: String,
}

impl FileLayerSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LayerSource for FileLayerSource {
    async fn fetch_layers(&self, target: &LayerTarget) -> Result<Value> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            GeoviewError::LayerFetch {
                target: target.to_string(),
                reason: format!("Failed to read {}: {}", self.name, e),
            }
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}
