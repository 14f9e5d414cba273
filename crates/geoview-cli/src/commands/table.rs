//! Table command implementation

use crate::cli::{TabChoice, TableArgs};
use crate::errors;
use crate::output::OutputWriter;
use anyhow::Result;
use geoview_core::config::LayeredConfig;
use geoview_core::models::{FeatureRef, LayerId};
use geoview_map::{DataTable, SelectedFeatureDetail, TableTab};
use serde::Serialize;
use tabled::Tabled;

use super::open_session;

#[derive(Tabled)]
struct LayerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    layer_type: String,
    #[tabled(rename = "Features")]
    feature_count: usize,
    #[tabled(rename = "Description")]
    description: String,
}

#[derive(Tabled)]
struct PropertyRow {
    #[tabled(rename = "Property")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Debug, Serialize)]
struct TableOutput<'a> {
    tab: TableTab,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    table: &'a DataTable,
}

pub async fn execute(args: TableArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let mut loaded = open_session(config, &args.source).await?;

    if let Some(raw) = &args.select {
        let feature = parse_feature_ref(raw)?;
        if !loaded.session.select_feature(feature.layer_id.clone(), feature.feature_index) {
            let layer = feature.layer_id.as_str();
            return Err(errors::feature_not_found(layer, feature.feature_index).into());
        }
    }

    let table = &loaded.session.snapshot().table;
    let tab = match args.tab {
        Some(TabChoice::Layers) => TableTab::Layers,
        Some(TabChoice::Features) => TableTab::Features,
        Some(TabChoice::Feature) => TableTab::Feature,
        None => table.default_tab,
    };

    if output.is_json() {
        return output.result(TableOutput { tab, message: table.empty_message(), table });
    }

    if let Some(message) = table.empty_message() {
        output.info(message);
        return Ok(());
    }

    match tab {
        TableTab::Layers => show_layers(table, output),
        TableTab::Features => show_features(table, output),
        TableTab::Feature => show_selected(table, output),
    }

    Ok(())
}

fn show_layers(table: &DataTable, output: &OutputWriter) {
    output.section("Layers");
    let rows = table
        .layer_summaries
        .iter()
        .map(|row| LayerRow {
            id: row.layer_id.to_string(),
            name: row.name.clone(),
            layer_type: row.layer_type.to_string(),
            feature_count: row.feature_count,
            description: row.description.clone(),
        })
        .collect();
    output.table(rows);
}

fn show_features(table: &DataTable, output: &OutputWriter) {
    output.section("Features");
    let mut headers: Vec<String> =
        ["Layer", "Name", "Type", "Coordinates"].iter().map(|h| h.to_string()).collect();
    headers.extend(table.property_columns.iter().cloned());

    let rows = table
        .all_features
        .iter()
        .map(|row| {
            let mut cells = vec![
                row.layer_name.clone(),
                row.display_name.clone(),
                row.type_label.clone(),
                row.coordinates.clone(),
            ];
            cells.extend(row.values.iter().cloned());
            cells
        })
        .collect();
    output.grid(headers, rows);
}

fn show_selected(table: &DataTable, output: &OutputWriter) {
    match &table.selected_feature_detail {
        SelectedFeatureDetail::NoSelection { message } => output.info(message),
        SelectedFeatureDetail::Feature(detail) => {
            output.section(&detail.title);
            output.kv("Layer", &detail.layer_name);
            output.kv("Type", &detail.type_label);
            output.kv("Coordinates", &detail.coordinates);
            let rows = detail
                .properties
                .iter()
                .map(|p| PropertyRow { key: p.key.clone(), value: p.value.clone() })
                .collect();
            output.table(rows);
        }
    }
}

/// Parse `LAYER:INDEX`; the layer id may itself contain colons
fn parse_feature_ref(raw: &str) -> Result<FeatureRef> {
    let (layer, index) = raw.rsplit_once(':').ok_or_else(|| errors::invalid_selection(raw))?;
    let index: usize = index.parse().map_err(|_| errors::invalid_selection(raw))?;
    if layer.is_empty() {
        return Err(errors::invalid_selection(raw).into());
    }
    Ok(FeatureRef::new(LayerId::new(layer), index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feature_ref() {
        assert_eq!(parse_feature_ref("roads:2").unwrap(), FeatureRef::new("roads", 2));
        assert_eq!(parse_feature_ref("urn:x:0").unwrap(), FeatureRef::new("urn:x", 0));
        assert!(parse_feature_ref("roads").is_err());
        assert!(parse_feature_ref(":1").is_err());
        assert!(parse_feature_ref("roads:first").is_err());
    }
}
