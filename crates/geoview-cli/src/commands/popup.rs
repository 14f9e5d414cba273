//! Popup command implementation

use crate::cli::PopupArgs;
use crate::errors;
use crate::output::OutputWriter;
use anyhow::Result;
use geoview_core::config::LayeredConfig;
use geoview_core::models::{FeatureRef, LayerId};
use tabled::Tabled;

use super::open_session;

#[derive(Tabled)]
struct PropertyRow {
    #[tabled(rename = "Property")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
}

pub async fn execute(args: PopupArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let loaded = open_session(config, &args.source).await?;
    let feature = FeatureRef::new(LayerId::new(args.layer.as_str()), args.index);

    let popup = loaded
        .session
        .popup(&feature)
        .map_err(|_| errors::layer_not_found(&args.layer))?
        .ok_or_else(|| errors::feature_not_found(&args.layer, args.index))?;

    if output.is_json() {
        return output.result(popup);
    }

    output.section(&popup.title);
    if let Some(body) = &popup.body {
        output.line(body);
    }
    output.kv("Type", &popup.type_label);
    output.kv("Coordinates", &popup.coordinates);
    if !popup.properties.is_empty() {
        let rows = popup
            .properties
            .iter()
            .map(|p| PropertyRow { key: p.key.clone(), value: p.value.clone() })
            .collect();
        output.table(rows);
    }

    Ok(())
}
