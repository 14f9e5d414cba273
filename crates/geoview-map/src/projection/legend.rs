use geoview_core::models::{Layer, LayerId, Paint, StyleSpec};
use serde::Serialize;

use crate::style::{legend_entries, LegendEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendKind {
    Simple,
    Categorical,
    Gradient,
}

/// Legend block for one active layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendGroup {
    pub layer_id: LayerId,
    pub layer_name: String,
    pub kind: LegendKind,
    pub entries: Vec<LegendEntry>,
}

/// One group per active layer, in the order given
pub fn legend(active_layers: &[&Layer]) -> Vec<LegendGroup> {
    active_layers
        .iter()
        .map(|layer| {
            let (kind, entries) = match &layer.style {
                Some(style @ StyleSpec::Categorical { .. }) => {
                    (LegendKind::Categorical, legend_entries(style, &layer.name))
                }
                Some(style @ StyleSpec::Gradient { .. }) => {
                    (LegendKind::Gradient, legend_entries(style, &layer.name))
                }
                Some(style) => (LegendKind::Simple, legend_entries(style, &layer.name)),
                None => (
                    LegendKind::Simple,
                    legend_entries(&StyleSpec::Simple(Paint::default()), &layer.name),
                ),
            };
            LegendGroup {
                layer_id: layer.id.clone(),
                layer_name: layer.name.clone(),
                kind,
                entries,
            }
        })
        .collect()
}

/// Screen-reader sentence summarizing the legend; empty when there is no
/// legend to show
pub fn legend_summary(groups: &[LegendGroup]) -> String {
    if groups.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = groups
        .iter()
        .map(|group| match group.kind {
            LegendKind::Categorical => {
                let categories: Vec<&str> =
                    group.entries.iter().map(|e| e.label.as_str()).collect();
                format!("{} with categories: {}.", group.layer_name, categories.join(", "))
            }
            _ => format!("{}.", group.layer_name),
        })
        .collect();
    format!("Map legend showing {} active layers: {}", groups.len(), parts.join(" "))
}
