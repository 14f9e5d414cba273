//! Base layer catalog offered by the map.

use serde::Serialize;

/// A background tile layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BaseLayer {
    pub name: &'static str,
    pub url_template: &'static str,
    pub attribution: &'static str,
    pub aria_label: &'static str,
}

pub const OSM_STANDARD: BaseLayer = BaseLayer {
    name: "OpenStreetMap Standard",
    url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
    attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors",
    aria_label: "OpenStreetMap standard view",
};

pub const OSM_HUMANITARIAN: BaseLayer = BaseLayer {
    name: "OpenStreetMap Humanitarian",
    url_template: "https://{s}.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png",
    attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors, \
                  <a href=\"https://www.hotosm.org/\">Humanitarian OpenStreetMap Team</a>",
    aria_label: "OpenStreetMap humanitarian view - higher contrast for better visibility",
};

pub const HIGH_CONTRAST: BaseLayer = BaseLayer {
    name: "High Contrast",
    url_template: "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}.png",
    attribution: "&copy; <a href=\"https://carto.com/\">CARTO</a>",
    aria_label: "High contrast map view for better visibility",
};

pub const SATELLITE: BaseLayer = BaseLayer {
    name: "Satellite",
    url_template: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
    attribution: "&copy; Esri &mdash; Source: Esri, i-cubed, USDA, USGS, AEX, GeoEye, Getmapping, \
                  Aerogrid, IGN, IGP, UPR-EGP, and the GIS User Community",
    aria_label: "Satellite imagery view",
};

/// Every base layer, in the order the layer control lists them
pub static BASE_LAYERS: [BaseLayer; 4] = [OSM_STANDARD, OSM_HUMANITARIAN, HIGH_CONTRAST, SATELLITE];

/// Base layer shown for the given contrast preference
pub fn default_base_layer(high_contrast: bool) -> &'static BaseLayer {
    if high_contrast {
        &HIGH_CONTRAST
    } else {
        &OSM_STANDARD
    }
}

pub fn find_base_layer(name: &str) -> Option<&'static BaseLayer> {
    BASE_LAYERS.iter().find(|layer| layer.name.eq_ignore_ascii_case(name))
}
