//! Fetch command implementation

use crate::cli::{FetchArgs, SourceArgs};
use crate::output::OutputWriter;
use anyhow::Result;
use geoview_client::HttpLayerSource;
use geoview_core::config::LayeredConfig;
use geoview_core::models::MapMove;
use geoview_map::projection::LayerSummaryRow;
use serde::Serialize;
use tabled::Tabled;

use super::open_session;

#[derive(Tabled)]
struct FetchedLayerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    layer_type: String,
    #[tabled(rename = "Features")]
    feature_count: usize,
}

#[derive(Debug, Serialize)]
struct FetchOutput<'a> {
    endpoint: String,
    layers: &'a [LayerSummaryRow],
    view: MapMove,
}

pub async fn execute(args: FetchArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let target = args.target.target();
    let endpoint = HttpLayerSource::new(config.api_base_url.value.clone()).url_for(&target);

    let source_args = SourceArgs { layers: None, target: args.target };
    let loaded = open_session(config, &source_args).await?;
    let snapshot = loaded.session.snapshot();
    let layers = &snapshot.table.layer_summaries;

    if output.is_json() {
        return output.result(FetchOutput { endpoint, layers, view: snapshot.view });
    }

    output.success(format!("Loaded {} layers from {}", layers.len(), endpoint));
    let rows = layers
        .iter()
        .map(|row| FetchedLayerRow {
            id: row.layer_id.to_string(),
            name: row.name.clone(),
            layer_type: row.layer_type.to_string(),
            feature_count: row.feature_count,
        })
        .collect();
    output.table(rows);

    output.section("View");
    let center = snapshot.view.center;
    output.kv("Center", format!("{:.4}, {:.4}", center.lat, center.lng));
    output.kv("Zoom", snapshot.view.zoom);

    Ok(())
}
