//! Configuration loading for CLI commands

use anyhow::{Context, Result};
use geoview_core::config::{CliConfigOverrides, LayeredConfig, MapOptions};
use std::path::{Path, PathBuf};

use crate::errors;

/// Looked up in the working directory when no --config is given
pub const DEFAULT_CONFIG_FILE: &str = "geoview.toml";

/// Build the layered configuration: defaults, file, environment, then CLI
pub fn load_config(path: Option<&Path>, overrides: CliConfigOverrides) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = resolve_config_path(path) {
        tracing::debug!(path = %path.display(), "Loading configuration file");
        config = config
            .load_from_file(&path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?;
    }

    let mut config = config.load_from_env();
    config.update_from_cli(overrides);
    Ok(config)
}

/// Validated map options for a session
pub fn map_options(config: &LayeredConfig) -> Result<MapOptions> {
    config.map_options().map_err(|e| errors::invalid_config(&e.to_string()).into())
}

fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let default = PathBuf::from(DEFAULT_CONFIG_FILE);
    default.is_file().then_some(default)
}
