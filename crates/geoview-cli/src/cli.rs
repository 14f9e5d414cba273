use clap::{Args, Parser, Subcommand};
use geoview_core::config::CliConfigOverrides;
use geoview_core::ports::LayerTarget;
use std::path::PathBuf;

/// GeoView - Accessible map layer composition
#[derive(Parser, Debug)]
#[command(name = "geoview")]
#[command(
    about = "Compose map layers into paint, legend, description and data table",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./geoview.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub view: ViewArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Map options overriding the configuration file and environment
#[derive(Args, Debug, Default)]
pub struct ViewArgs {
    /// Initial center latitude
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Initial center longitude
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Initial zoom level
    #[arg(long, global = true)]
    pub zoom: Option<u8>,

    /// Backend API base URL (e.g., http://localhost:5000/api)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Use the high contrast base layer
    #[arg(long, global = true)]
    pub high_contrast: bool,

    /// Disable keyboard navigation
    #[arg(long, global = true)]
    pub no_keyboard: bool,
}

impl ViewArgs {
    pub fn overrides(&self) -> CliConfigOverrides {
        CliConfigOverrides {
            center_lat: self.lat,
            center_lng: self.lng,
            zoom: self.zoom,
            api_base_url: self.api_url.clone(),
            keyboard_navigation: self.no_keyboard.then_some(false),
            high_contrast: self.high_contrast.then_some(true),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the live text description of the map
    Describe(DescribeArgs),

    /// Show the legend of the active layers
    Legend(LegendArgs),

    /// Show the accessible data table
    Table(TableArgs),

    /// Show the popup for one feature
    Popup(PopupArgs),

    /// Apply a script of interaction commands and report what happened
    Replay(ReplayArgs),

    /// Load layers from the backend API and summarize them
    Fetch(FetchArgs),

    /// Show effective configuration and where each value came from
    Config,
}

/// Where layers are loaded from
#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// Read the layer collection from a JSON file instead of the backend
    #[arg(long, value_name = "FILE")]
    pub layers: Option<PathBuf>,

    #[command(flatten)]
    pub target: TargetArgs,
}

/// Which backend endpoint to query
#[derive(Args, Debug, Default)]
pub struct TargetArgs {
    /// Load the layers of a dataset
    #[arg(long, value_name = "ID", conflicts_with = "analysis")]
    pub dataset: Option<String>,

    /// Load the layers of an analysis result
    #[arg(long, value_name = "ID")]
    pub analysis: Option<String>,
}

impl TargetArgs {
    pub fn target(&self) -> LayerTarget {
        match (&self.dataset, &self.analysis) {
            (Some(id), _) => LayerTarget::Dataset(id.clone()),
            (None, Some(id)) => LayerTarget::Analysis(id.clone()),
            (None, None) => LayerTarget::All,
        }
    }
}

#[derive(Parser, Debug)]
pub struct DescribeArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Parser, Debug)]
pub struct LegendArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Parser, Debug)]
pub struct TableArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Tab to show (defaults to the tab the table opens on)
    #[arg(long, value_enum)]
    pub tab: Option<TabChoice>,

    /// Select a feature before building the table, as LAYER:INDEX
    #[arg(long, value_name = "LAYER:INDEX")]
    pub select: Option<String>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum TabChoice {
    /// One row per active layer
    Layers,
    /// Every feature of every active layer
    Features,
    /// Properties of the selected feature
    Feature,
}

#[derive(Parser, Debug)]
pub struct PopupArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Layer id
    #[arg(long)]
    pub layer: String,

    /// Feature index within the layer
    #[arg(long, default_value = "0")]
    pub index: usize,
}

#[derive(Parser, Debug)]
pub struct ReplayArgs {
    /// Script file, one command per line
    ///
    /// Commands: toggle LAYER on|off, pan DX DY, zoom LEVEL,
    /// view LAT LNG ZOOM, focus, blur, focus-feature LAYER INDEX|none,
    /// key NAME, select LAYER INDEX, clear-selection, contrast on|off,
    /// keyboard on|off, table show|hide, basemap NAME.
    /// Lines starting with '#' are ignored.
    pub script: PathBuf,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Print the final snapshot after the script
    #[arg(long)]
    pub snapshot: bool,
}

#[derive(Parser, Debug)]
pub struct FetchArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}
