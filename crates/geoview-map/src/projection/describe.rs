use geoview_core::models::{Layer, MapMove};
use geoview_geo::format_coord;

/// Live description of the map for screen readers.
///
/// Three sentences in fixed order: view center and zoom, active layers, and
/// the visible area from south-west to north-east corner.
pub fn describe(view: &MapMove, active_layers: &[&Layer]) -> String {
    let mut description = format!(
        "Interactive map centered at latitude {} and longitude {}, zoom level {}.",
        format_coord(view.center.lat),
        format_coord(view.center.lng),
        view.zoom
    );

    if active_layers.is_empty() {
        description.push_str(" No data layers are currently active.");
    } else {
        let names: Vec<&str> = active_layers.iter().map(|l| l.name.as_str()).collect();
        description.push_str(&format!(" Showing {} layers: {}.", names.len(), names.join(", ")));
    }

    let south_west = view.bounds.south_west();
    let north_east = view.bounds.north_east();
    description.push_str(&format!(
        " Map area covers from {},{} to {},{}.",
        format_coord(south_west.lat),
        format_coord(south_west.lng),
        format_coord(north_east.lat),
        format_coord(north_east.lng)
    ));
    description
}
