use async_trait::async_trait;
use geoview_core::error::{GeoviewError, Result};
use geoview_core::ports::{LayerSource, LayerTarget};
use serde_json::Value;

/// Layer source backed by the backend HTTP API
pub struct HttpLayerSource {
    /// Base URL of the API (e.g., "http://localhost:5000/api")
    base_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpLayerSource {
    /// Create a new source for the API at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Create with the default local development URL
    pub fn localhost() -> Self {
        Self::new("http://localhost:5000/api")
    }

    /// Full URL of the endpoint serving `target`
    pub fn url_for(&self, target: &LayerTarget) -> String {
        format!("{}{}", self.base_url, target.path())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl LayerSource for HttpLayerSource {
    async fn fetch_layers(&self, target: &LayerTarget) -> Result<Value> {
        let url = self.url_for(target);
        tracing::debug!(%url, "Fetching layers");

        let response = self.client.get(&url).send().await.map_err(|e| GeoviewError::LayerFetch {
            target: target.to_string(),
            reason: format!("Failed to connect to {}: {}", self.base_url, e),
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(GeoviewError::LayerFetch {
                target: target.to_string(),
                reason: format!("API error ({}): {}", status, error_text),
            });
        }

        response.json::<Value>().await.map_err(|e| GeoviewError::LayerFetch {
            target: target.to_string(),
            reason: format!("Failed to parse layer response: {}", e),
        })
    }

    fn source_name(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_urls() {
        let source = HttpLayerSource::new("http://maps.example/api/");
        assert_eq!(source.base_url(), "http://maps.example/api");
        assert_eq!(
            source.url_for(&LayerTarget::Dataset("12".to_string())),
            "http://maps.example/api/data/datasets/12/layers"
        );
        assert_eq!(
            source.url_for(&LayerTarget::Analysis("4".to_string())),
            "http://maps.example/api/analysis/4/layers"
        );
        assert_eq!(source.url_for(&LayerTarget::All), "http://maps.example/api/data/layers");
    }

    #[test]
    fn test_localhost_source() {
        let source = HttpLayerSource::localhost();
        assert_eq!(source.source_name(), "http://localhost:5000/api");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_a_fetch_error() {
        let source = HttpLayerSource::new("http://127.0.0.1:1/api");
        let result = source.fetch_layers(&LayerTarget::All).await;
        assert!(matches!(result, Err(GeoviewError::LayerFetch { .. })));
    }
}
