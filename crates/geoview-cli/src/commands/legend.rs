//! Legend command implementation

use crate::cli::LegendArgs;
use crate::output::OutputWriter;
use anyhow::Result;
use geoview_core::config::LayeredConfig;
use serde::Serialize;
use tabled::Tabled;

use super::open_session;

#[derive(Tabled)]
struct LegendRow {
    #[tabled(rename = "Layer")]
    layer: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Color")]
    color: String,
    #[tabled(rename = "Opacity")]
    opacity: String,
}

#[derive(Debug, Serialize)]
struct LegendOutput<'a> {
    summary: &'a str,
    groups: &'a [geoview_map::LegendGroup],
}

pub async fn execute(
    args: LegendArgs,
    config: &LayeredConfig,
    output: &OutputWriter,
) -> Result<()> {
    let loaded = open_session(config, &args.source).await?;
    let snapshot = loaded.session.snapshot();

    if output.is_json() {
        return output.result(LegendOutput {
            summary: &snapshot.legend_summary,
            groups: &snapshot.legend,
        });
    }

    if snapshot.legend.is_empty() {
        output.info("No active layers");
        return Ok(());
    }

    let rows: Vec<LegendRow> = snapshot
        .legend
        .iter()
        .flat_map(|group| {
            group.entries.iter().map(move |entry| LegendRow {
                layer: group.layer_name.clone(),
                label: entry.label.clone(),
                color: entry.swatch.color.clone(),
                opacity: format!("{:.2}", entry.swatch.opacity),
            })
        })
        .collect();
    output.table(rows);

    output.section("Summary");
    output.line(&snapshot.legend_summary);

    Ok(())
}
