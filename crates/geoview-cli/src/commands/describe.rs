//! Describe command implementation

use crate::cli::DescribeArgs;
use crate::output::OutputWriter;
use anyhow::Result;
use geoview_core::config::LayeredConfig;
use serde::Serialize;

use super::open_session;

#[derive(Debug, Serialize)]
struct DescribeOutput<'a> {
    description: &'a str,
    center: [f64; 2],
    zoom: u8,
    active_layers: usize,
}

pub async fn execute(
    args: DescribeArgs,
    config: &LayeredConfig,
    output: &OutputWriter,
) -> Result<()> {
    let loaded = open_session(config, &args.source).await?;
    let snapshot = loaded.session.snapshot();

    if output.is_json() {
        output.result(DescribeOutput {
            description: &snapshot.description,
            center: [snapshot.view.center.lat, snapshot.view.center.lng],
            zoom: snapshot.view.zoom,
            active_layers: snapshot.legend.len(),
        })?;
    } else {
        output.line(&snapshot.description);
    }

    Ok(())
}
