//! Command implementations

mod config;
mod describe;
mod fetch;
mod legend;
mod popup;
mod replay;
mod table;

use crate::cli::{Cli, Commands, SourceArgs};
use crate::config_loader::{load_config, map_options};
use crate::errors;
use crate::output::OutputWriter;
use anyhow::Result;
use geoview_client::{load_layers, FileLayerSource, HttpLayerSource};
use geoview_core::config::LayeredConfig;
use geoview_core::models::MapEvent;
use geoview_core::ports::LayerSource;
use geoview_map::{MapSession, LOAD_FAILED_MESSAGE};

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config(cli.config.as_deref(), cli.view.overrides())?;

    match cli.command {
        Commands::Describe(args) => describe::execute(args, &config, &output).await,
        Commands::Legend(args) => legend::execute(args, &config, &output).await,
        Commands::Table(args) => table::execute(args, &config, &output).await,
        Commands::Popup(args) => popup::execute(args, &config, &output).await,
        Commands::Replay(args) => replay::execute(args, &config, &output).await,
        Commands::Fetch(args) => fetch::execute(args, &config, &output).await,
        Commands::Config => config::execute(&config, &output),
    }
}

/// A session with layers loaded, plus the events the load produced
pub(crate) struct LoadedSession {
    pub session: MapSession,
    pub events: Vec<MapEvent>,
}

/// Create a session from the configuration and load layers into it.
///
/// A failed load is turned into an error here; a command that prints
/// projections of an empty map would only hide the problem.
pub(crate) async fn open_session(
    config: &LayeredConfig,
    source_args: &SourceArgs,
) -> Result<LoadedSession> {
    let source: Box<dyn LayerSource> = match &source_args.layers {
        Some(path) => Box::new(FileLayerSource::new(path)),
        None => Box::new(HttpLayerSource::new(config.api_base_url.value.clone())),
    };
    let target = source_args.target.target();

    let mut session = MapSession::new(map_options(config)?);
    load_layers(&mut session, source.as_ref(), target).await;
    let events = session.drain_events();

    if events.iter().any(|e| matches!(e, MapEvent::Status(s) if s == LOAD_FAILED_MESSAGE)) {
        return Err(errors::load_failed(source.source_name(), LOAD_FAILED_MESSAGE).into());
    }

    Ok(LoadedSession { session, events })
}
