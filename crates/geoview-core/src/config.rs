use crate::error::{GeoviewError, Result};
use crate::models::viewport::{LatLng, ViewportSize, ZoomRange};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Map settings resolved from a [`LayeredConfig`]
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub center: LatLng,
    pub zoom: u8,
    pub zoom_range: ZoomRange,
    pub viewport: ViewportSize,
    pub pan_step: f64,
    pub keyboard_navigation: bool,
    pub high_contrast: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center: LatLng::new(51.505, -0.09),
            zoom: 13,
            zoom_range: ZoomRange::default(),
            viewport: ViewportSize::default(),
            pan_step: 100.0,
            keyboard_navigation: true,
            high_contrast: false,
        }
    }
}

/// Layered configuration for GeoView
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub center_lat: ConfigValue<f64>,
    pub center_lng: ConfigValue<f64>,
    pub zoom: ConfigValue<u8>,
    pub min_zoom: ConfigValue<u8>,
    pub max_zoom: ConfigValue<u8>,
    pub viewport_width: ConfigValue<u32>,
    pub viewport_height: ConfigValue<u32>,
    pub pan_step: ConfigValue<f64>,
    pub api_base_url: ConfigValue<String>,
    pub keyboard_navigation: ConfigValue<bool>,
    pub high_contrast: ConfigValue<bool>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        let defaults = MapOptions::default();
        Self {
            center_lat: ConfigValue::new(defaults.center.lat, ConfigSource::Default),
            center_lng: ConfigValue::new(defaults.center.lng, ConfigSource::Default),
            zoom: ConfigValue::new(defaults.zoom, ConfigSource::Default),
            min_zoom: ConfigValue::new(defaults.zoom_range.min, ConfigSource::Default),
            max_zoom: ConfigValue::new(defaults.zoom_range.max, ConfigSource::Default),
            viewport_width: ConfigValue::new(defaults.viewport.width, ConfigSource::Default),
            viewport_height: ConfigValue::new(defaults.viewport.height, ConfigSource::Default),
            pan_step: ConfigValue::new(defaults.pan_step, ConfigSource::Default),
            api_base_url: ConfigValue::new(
                "http://localhost:5000/api".to_string(),
                ConfigSource::Default,
            ),
            keyboard_navigation: ConfigValue::new(
                defaults.keyboard_navigation,
                ConfigSource::Default,
            ),
            high_contrast: ConfigValue::new(defaults.high_contrast, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| GeoviewError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| GeoviewError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        let source = ConfigSource::File;
        if let Some(map) = file_config.map {
            if let Some(v) = map.center_lat {
                self.center_lat.update(v, source);
            }
            if let Some(v) = map.center_lng {
                self.center_lng.update(v, source);
            }
            if let Some(v) = map.zoom {
                self.zoom.update(v, source);
            }
            if let Some(v) = map.min_zoom {
                self.min_zoom.update(v, source);
            }
            if let Some(v) = map.max_zoom {
                self.max_zoom.update(v, source);
            }
            if let Some(v) = map.viewport_width {
                self.viewport_width.update(v, source);
            }
            if let Some(v) = map.viewport_height {
                self.viewport_height.update(v, source);
            }
            if let Some(v) = map.pan_step {
                self.pan_step.update(v, source);
            }
        }

        if let Some(api) = file_config.api {
            if let Some(url) = api.base_url {
                self.api_base_url.update(url, source);
            }
        }

        if let Some(a11y) = file_config.accessibility {
            if let Some(v) = a11y.keyboard_navigation {
                self.keyboard_navigation.update(v, source);
            }
            if let Some(v) = a11y.high_contrast {
                self.high_contrast.update(v, source);
            }
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        let source = ConfigSource::Environment;

        if let Some(v) = env_parsed::<f64>("GEOVIEW_CENTER_LAT", "decimal latitude") {
            self.center_lat.update(v, source);
        }
        if let Some(v) = env_parsed::<f64>("GEOVIEW_CENTER_LNG", "decimal longitude") {
            self.center_lng.update(v, source);
        }
        if let Some(v) = env_parsed::<u8>("GEOVIEW_ZOOM", "integer zoom level") {
            self.zoom.update(v, source);
        }
        if let Some(v) = env_parsed::<u8>("GEOVIEW_MIN_ZOOM", "integer zoom level") {
            self.min_zoom.update(v, source);
        }
        if let Some(v) = env_parsed::<u8>("GEOVIEW_MAX_ZOOM", "integer zoom level") {
            self.max_zoom.update(v, source);
        }
        if let Some(v) = env_parsed::<u32>("GEOVIEW_VIEWPORT_WIDTH", "width in pixels") {
            self.viewport_width.update(v, source);
        }
        if let Some(v) = env_parsed::<u32>("GEOVIEW_VIEWPORT_HEIGHT", "height in pixels") {
            self.viewport_height.update(v, source);
        }
        if let Some(v) = env_parsed::<f64>("GEOVIEW_PAN_STEP", "pan step in pixels") {
            self.pan_step.update(v, source);
        }

        // GEOVIEW_API_URL
        if let Ok(url) = env::var("GEOVIEW_API_URL") {
            self.api_base_url.update(url, source);
        }

        if let Ok(raw) = env::var("GEOVIEW_KEYBOARD_NAVIGATION") {
            match parse_bool(&raw) {
                Ok(v) => self.keyboard_navigation.update(v, source),
                Err(_) => tracing::warn!(
                    "Invalid GEOVIEW_KEYBOARD_NAVIGATION value '{}': expected true or false",
                    raw
                ),
            }
        }

        if let Ok(raw) = env::var("GEOVIEW_HIGH_CONTRAST") {
            match parse_bool(&raw) {
                Ok(v) => self.high_contrast.update(v, source),
                Err(_) => tracing::warn!(
                    "Invalid GEOVIEW_HIGH_CONTRAST value '{}': expected true or false",
                    raw
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        let source = ConfigSource::Cli;
        if let Some(v) = overrides.center_lat {
            self.center_lat.update(v, source);
        }
        if let Some(v) = overrides.center_lng {
            self.center_lng.update(v, source);
        }
        if let Some(v) = overrides.zoom {
            self.zoom.update(v, source);
        }
        if let Some(url) = overrides.api_base_url {
            self.api_base_url.update(url, source);
        }
        if let Some(v) = overrides.keyboard_navigation {
            self.keyboard_navigation.update(v, source);
        }
        if let Some(v) = overrides.high_contrast {
            self.high_contrast.update(v, source);
        }
    }

    /// Check cross-field constraints and build the map options
    pub fn map_options(&self) -> Result<MapOptions> {
        let lat = self.center_lat.value;
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(GeoviewError::ConfigInvalid {
                key: "center_lat".to_string(),
                reason: format!("{} is not a latitude between -90 and 90", lat),
            });
        }

        let lng = self.center_lng.value;
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(GeoviewError::ConfigInvalid {
                key: "center_lng".to_string(),
                reason: format!("{} is not a longitude between -180 and 180", lng),
            });
        }

        if self.min_zoom.value > self.max_zoom.value {
            return Err(GeoviewError::ConfigInvalid {
                key: "min_zoom".to_string(),
                reason: format!(
                    "min_zoom {} is greater than max_zoom {}",
                    self.min_zoom.value, self.max_zoom.value
                ),
            });
        }

        if self.viewport_width.value == 0 || self.viewport_height.value == 0 {
            return Err(GeoviewError::ConfigInvalid {
                key: "viewport".to_string(),
                reason: "viewport dimensions must be non-zero".to_string(),
            });
        }

        if !(self.pan_step.value.is_finite() && self.pan_step.value > 0.0) {
            return Err(GeoviewError::ConfigInvalid {
                key: "pan_step".to_string(),
                reason: format!("{} is not a positive pixel distance", self.pan_step.value),
            });
        }

        let zoom_range = ZoomRange::new(self.min_zoom.value, self.max_zoom.value);
        Ok(MapOptions {
            center: LatLng::new(lat, lng),
            zoom: zoom_range.clamp(self.zoom.value as i32),
            zoom_range,
            viewport: ViewportSize::new(self.viewport_width.value, self.viewport_height.value),
            pan_step: self.pan_step.value,
            keyboard_navigation: self.keyboard_navigation.value,
            high_contrast: self.high_contrast.value,
        })
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        let mut put = |key: &str, value: String, source: ConfigSource| {
            map.insert(key.to_string(), (value, source));
        };

        put("center_lat", format!("{:.4}", self.center_lat.value), self.center_lat.source);
        put("center_lng", format!("{:.4}", self.center_lng.value), self.center_lng.source);
        put("zoom", self.zoom.value.to_string(), self.zoom.source);
        put("min_zoom", self.min_zoom.value.to_string(), self.min_zoom.source);
        put("max_zoom", self.max_zoom.value.to_string(), self.max_zoom.source);
        put(
            "viewport",
            format!("{}x{}", self.viewport_width.value, self.viewport_height.value),
            self.viewport_width.source.max_by_precedence(self.viewport_height.source),
        );
        put("pan_step", format!("{}px", self.pan_step.value), self.pan_step.source);
        put("api_base_url", self.api_base_url.value.clone(), self.api_base_url.source);
        put(
            "keyboard_navigation",
            self.keyboard_navigation.value.to_string(),
            self.keyboard_navigation.source,
        );
        put("high_contrast", self.high_contrast.value.to_string(), self.high_contrast.source);

        map
    }
}

impl ConfigSource {
    fn max_by_precedence(self, other: ConfigSource) -> ConfigSource {
        if other.precedence() > self.precedence() {
            other
        } else {
            self
        }
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Default, Deserialize, Serialize)]
struct FileConfig {
    map: Option<MapSection>,
    api: Option<ApiSection>,
    accessibility: Option<AccessibilitySection>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct MapSection {
    center_lat: Option<f64>,
    center_lng: Option<f64>,
    zoom: Option<u8>,
    min_zoom: Option<u8>,
    max_zoom: Option<u8>,
    viewport_width: Option<u32>,
    viewport_height: Option<u32>,
    pan_step: Option<f64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct ApiSection {
    base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct AccessibilitySection {
    keyboard_navigation: Option<bool>,
    high_contrast: Option<bool>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub center_lat: Option<f64>,
    pub center_lng: Option<f64>,
    pub zoom: Option<u8>,
    pub api_base_url: Option<String>,
    pub keyboard_navigation: Option<bool>,
    pub high_contrast: Option<bool>,
}

/// Parse a boolean flag from string
pub fn parse_bool(s: &str) -> Result<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(GeoviewError::ConfigInvalid {
            key: "flag".to_string(),
            reason: format!("Invalid boolean: {}. Use true or false", s),
        }),
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str, expected: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!("Invalid {} value '{}': expected {}", key, raw, expected);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.center_lat.value, 51.505);
        assert_eq!(config.center_lng.value, -0.09);
        assert_eq!(config.zoom.value, 13);
        assert_eq!(config.zoom.source, ConfigSource::Default);
        assert_eq!(config.pan_step.value, 100.0);
        assert!(config.keyboard_navigation.value);
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(10, ConfigSource::Default);

        value.update(11, ConfigSource::File);
        assert_eq!(value.value, 11);

        value.update(12, ConfigSource::Environment);
        assert_eq!(value.value, 12);

        value.update(13, ConfigSource::Cli);
        assert_eq!(value.value, 13);
        assert_eq!(value.source, ConfigSource::Cli);

        // Lower precedence should not override
        value.update(14, ConfigSource::File);
        assert_eq!(value.value, 13);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[map]
center_lat = 40.715
center_lng = -74.005
zoom = 15
max_zoom = 16

[api]
base_url = "https://gis.example.org/api"

[accessibility]
high_contrast = true
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.center_lat.value, 40.715);
        assert_eq!(config.center_lat.source, ConfigSource::File);
        assert_eq!(config.zoom.value, 15);
        assert_eq!(config.max_zoom.value, 16);
        assert_eq!(config.api_base_url.value, "https://gis.example.org/api");
        assert!(config.high_contrast.value);
        assert_eq!(config.keyboard_navigation.source, ConfigSource::Default);
    }

    #[test]
    fn test_load_from_bad_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[map]\nzoom = \"close\"").unwrap();

        let err = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, GeoviewError::ConfigInvalid { .. }));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        config.update_from_cli(CliConfigOverrides {
            zoom: Some(4),
            keyboard_navigation: Some(false),
            ..Default::default()
        });

        assert_eq!(config.zoom.value, 4);
        assert_eq!(config.zoom.source, ConfigSource::Cli);
        assert!(!config.keyboard_navigation.value);
        assert_eq!(config.center_lat.source, ConfigSource::Default);
    }

    #[test]
    fn test_map_options_clamps_zoom() {
        let mut config = LayeredConfig::with_defaults();
        config.max_zoom.update(10, ConfigSource::Cli);

        let options = config.map_options().unwrap();
        assert_eq!(options.zoom, 10);
        assert_eq!(options.zoom_range, ZoomRange::new(0, 10));
    }

    #[test]
    fn test_map_options_rejects_invalid() {
        let mut config = LayeredConfig::with_defaults();
        config.min_zoom.update(12, ConfigSource::Cli);
        config.max_zoom.update(4, ConfigSource::Cli);
        assert!(config.map_options().is_err());

        let mut config = LayeredConfig::with_defaults();
        config.center_lat.update(95.0, ConfigSource::Cli);
        assert!(config.map_options().is_err());

        let mut config = LayeredConfig::with_defaults();
        config.pan_step.update(0.0, ConfigSource::Cli);
        assert!(config.map_options().is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("TRUE").unwrap());
        assert!(parse_bool("on").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn test_inspection_map() {
        let config = LayeredConfig::with_defaults();
        let map = config.to_inspection_map();

        let (center_lat, source) = &map["center_lat"];
        assert_eq!(center_lat, "51.5050");
        assert_eq!(*source, ConfigSource::Default);
        assert_eq!(map["viewport"].0, "800x600");
        assert!(map.contains_key("api_base_url"));
    }
}
