//! Accessible projections of the map state.
//!
//! Every function here is pure: the same active layers, viewport and
//! selection always produce the same text and tables.

pub mod describe;
pub mod legend;
pub mod popup;
pub mod table;

pub use describe::describe;
pub use legend::{legend, legend_summary, LegendGroup, LegendKind};
pub use popup::{popup, Popup};
pub use table::{
    data_table, DataTable, FeatureDetail, FeatureRow, LayerSummaryRow, PropertyRow,
    SelectedFeatureDetail, TableTab, MAX_PROPERTY_COLUMNS, NO_FEATURES_MESSAGE,
    NO_SELECTION_MESSAGE,
};

use serde_json::Value;

/// Truthiness used when picking a display name from feature properties:
/// null, false, zero and empty strings do not count
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
