//! Replay scripts: a line-oriented list of interaction commands applied to a
//! map session in order.

use geoview_core::models::{FeatureRef, LatLng, LayerId};
use geoview_map::{Key, KeyOutcome, MapSession};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ScriptError {
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand { line: usize, command: String },

    #[error("line {line}: '{command}' expects {expected}")]
    WrongArguments { line: usize, command: String, expected: &'static str },

    #[error("line {line}: invalid value '{value}' for {argument}")]
    InvalidValue { line: usize, argument: &'static str, value: String },
}

/// One interaction step
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Toggle { layer: LayerId, active: bool },
    /// Drag by a pixel offset, ending the move
    Pan { dx: f64, dy: f64 },
    Zoom(i32),
    View { center: LatLng, zoom: i32 },
    Focus(bool),
    FocusFeature(Option<FeatureRef>),
    Key(Key),
    Select(FeatureRef),
    ClearSelection,
    HighContrast(bool),
    KeyboardNavigation(bool),
    DataTable(bool),
    BaseLayer(String),
}

/// A parsed step with the line it came from
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    pub line: usize,
    pub text: String,
    pub step: Step,
}

pub fn parse_script(source: &str) -> Result<Vec<ScriptLine>, ScriptError> {
    let mut steps = Vec::new();
    for (i, raw) in source.lines().enumerate() {
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let step = parse_step(i + 1, text)?;
        steps.push(ScriptLine { line: i + 1, text: text.to_string(), step });
    }
    Ok(steps)
}

fn parse_step(line: usize, text: &str) -> Result<Step, ScriptError> {
    let mut words = text.split_whitespace();
    let command = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();

    let wrong = |expected: &'static str| ScriptError::WrongArguments {
        line,
        command: command.to_string(),
        expected,
    };

    let step = match (command, args.as_slice()) {
        ("toggle", [layer, state]) => Step::Toggle {
            layer: LayerId::new(*layer),
            active: parse_switch(line, "layer state", state, "on", "off")?,
        },
        ("toggle", _) => return Err(wrong("LAYER on|off")),
        ("pan", [dx, dy]) => Step::Pan {
            dx: parse_number(line, "dx", dx)?,
            dy: parse_number(line, "dy", dy)?,
        },
        ("pan", _) => return Err(wrong("DX DY")),
        ("zoom", [level]) => Step::Zoom(parse_number(line, "zoom", level)?),
        ("zoom", _) => return Err(wrong("LEVEL")),
        ("view", [lat, lng, zoom]) => Step::View {
            center: LatLng::new(parse_number(line, "lat", lat)?, parse_number(line, "lng", lng)?),
            zoom: parse_number(line, "zoom", zoom)?,
        },
        ("view", _) => return Err(wrong("LAT LNG ZOOM")),
        ("focus", []) => Step::Focus(true),
        ("blur", []) => Step::Focus(false),
        ("focus-feature", ["none"]) => Step::FocusFeature(None),
        ("focus-feature", [layer, index]) => {
            Step::FocusFeature(Some(FeatureRef::new(*layer, parse_number(line, "index", index)?)))
        }
        ("focus-feature", _) => return Err(wrong("LAYER INDEX or none")),
        ("key", [name]) => Step::Key(Key::from_name(name)),
        ("key", _) => return Err(wrong("a key name")),
        ("select", [layer, index]) => {
            Step::Select(FeatureRef::new(*layer, parse_number(line, "index", index)?))
        }
        ("select", _) => return Err(wrong("LAYER INDEX")),
        ("clear-selection", []) => Step::ClearSelection,
        ("contrast", [state]) => {
            Step::HighContrast(parse_switch(line, "contrast", state, "on", "off")?)
        }
        ("keyboard", [state]) => {
            Step::KeyboardNavigation(parse_switch(line, "keyboard", state, "on", "off")?)
        }
        ("table", [state]) => Step::DataTable(parse_switch(line, "table", state, "show", "hide")?),
        ("basemap", name) if !name.is_empty() => Step::BaseLayer(name.join(" ")),
        ("basemap", _) => return Err(wrong("a base layer name")),
        ("focus" | "blur" | "clear-selection", _) => return Err(wrong("no arguments")),
        ("contrast" | "keyboard", _) => return Err(wrong("on|off")),
        ("table", _) => return Err(wrong("show|hide")),
        (other, _) => {
            return Err(ScriptError::UnknownCommand { line, command: other.to_string() })
        }
    };
    Ok(step)
}

fn parse_number<T: std::str::FromStr>(
    line: usize,
    argument: &'static str,
    value: &str,
) -> Result<T, ScriptError> {
    value
        .parse()
        .map_err(|_| ScriptError::InvalidValue { line, argument, value: value.to_string() })
}

fn parse_switch(
    line: usize,
    argument: &'static str,
    value: &str,
    on: &str,
    off: &str,
) -> Result<bool, ScriptError> {
    if value == on {
        Ok(true)
    } else if value == off {
        Ok(false)
    } else {
        Err(ScriptError::InvalidValue { line, argument, value: value.to_string() })
    }
}

/// Apply one step. Returns false when the session rejected it (unknown
/// layer, unavailable feature, unbound key).
pub fn apply(session: &mut MapSession, step: &Step) -> bool {
    match step {
        Step::Toggle { layer, active } => session.toggle_layer(layer, *active),
        Step::Pan { dx, dy } => {
            session.pan_by(*dx, *dy);
            session.move_end();
            true
        }
        Step::Zoom(level) => {
            session.set_zoom(*level);
            session.move_end();
            true
        }
        Step::View { center, zoom } => {
            session.set_view(*center, *zoom);
            session.move_end();
            true
        }
        Step::Focus(focused) => {
            session.set_focus(*focused);
            true
        }
        Step::FocusFeature(feature) => {
            session.focus_feature(feature.clone());
            true
        }
        Step::Key(key) => session.handle_key(key) != KeyOutcome::Ignored,
        Step::Select(feature) => {
            session.select_feature(feature.layer_id.clone(), feature.feature_index)
        }
        Step::ClearSelection => {
            session.clear_selection();
            true
        }
        Step::HighContrast(enabled) => {
            session.set_high_contrast(*enabled);
            true
        }
        Step::KeyboardNavigation(enabled) => {
            session.set_keyboard_navigation(*enabled);
            true
        }
        Step::DataTable(visible) => {
            session.set_data_table_visible(*visible);
            true
        }
        Step::BaseLayer(name) => session.select_base_layer(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoview_core::config::MapOptions;
    use geoview_core::models::{GeometrySource, Layer, MapEvent};

    #[test]
    fn test_parse_script_skips_comments_and_blank_lines() {
        let script = "# open the map\n\nfocus\nkey ArrowUp\n  toggle roads off  \n";
        let steps = parse_script(script).unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].line, 3);
        assert_eq!(steps[1].step, Step::Key(Key::ArrowUp));
        assert_eq!(steps[2].step, Step::Toggle { layer: LayerId::new("roads"), active: false });
        assert_eq!(steps[2].text, "toggle roads off");
    }

    #[test]
    fn test_parse_script_arguments() {
        let steps = parse_script(
            "pan 0 -100\nview 40.7 -74.0 12\nselect 3 1\nfocus-feature none\nbasemap OSM Humanitarian\ntable show",
        )
        .unwrap();
        let steps: Vec<Step> = steps.into_iter().map(|s| s.step).collect();
        assert_eq!(steps[0], Step::Pan { dx: 0.0, dy: -100.0 });
        assert_eq!(steps[1], Step::View { center: LatLng::new(40.7, -74.0), zoom: 12 });
        assert_eq!(steps[2], Step::Select(FeatureRef::new("3", 1)));
        assert_eq!(steps[3], Step::FocusFeature(None));
        assert_eq!(steps[4], Step::BaseLayer("OSM Humanitarian".to_string()));
        assert_eq!(steps[5], Step::DataTable(true));
    }

    #[test]
    fn test_parse_script_errors_name_the_line() {
        assert_eq!(
            parse_script("focus\nwiggle 3").unwrap_err(),
            ScriptError::UnknownCommand { line: 2, command: "wiggle".to_string() }
        );
        assert!(matches!(
            parse_script("pan 10").unwrap_err(),
            ScriptError::WrongArguments { line: 1, .. }
        ));
        assert_eq!(
            parse_script("toggle roads maybe").unwrap_err(),
            ScriptError::InvalidValue {
                line: 1,
                argument: "layer state",
                value: "maybe".to_string(),
            }
        );
        let message = parse_script("zoom far").unwrap_err().to_string();
        assert_eq!(message, "line 1: invalid value 'far' for zoom");
    }

    #[test]
    fn test_apply_reports_rejected_steps() {
        let mut session = MapSession::new(MapOptions::default());
        session.set_layers(vec![Layer::new(
            "cafe",
            "Cafe",
            GeometrySource::marker(LatLng::new(51.5, -0.09), "Cafe"),
        )]);
        session.drain_events();

        let toggle_missing = Step::Toggle { layer: LayerId::new("missing"), active: false };
        assert!(!apply(&mut session, &toggle_missing));
        assert!(!apply(&mut session, &Step::Key(Key::ArrowUp)));
        assert!(!apply(&mut session, &Step::BaseLayer("Watercolor".to_string())));
        assert!(apply(&mut session, &Step::Select(FeatureRef::new("cafe", 0))));
        assert!(!apply(&mut session, &Step::Select(FeatureRef::new("cafe", 5))));
    }

    #[test]
    fn test_pan_step_ends_the_move() {
        let mut session = MapSession::new(MapOptions::default());
        session.drain_events();

        assert!(apply(&mut session, &Step::Pan { dx: 0.0, dy: -100.0 }));
        let moves: Vec<_> = session
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, MapEvent::MapMoved(_)))
            .collect();
        assert_eq!(moves.len(), 1);
    }
}
