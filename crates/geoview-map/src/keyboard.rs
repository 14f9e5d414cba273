//! Keyboard input adapter.
//!
//! Translates key presses into viewport commands. Keys are only honoured
//! while the map surface has focus and keyboard navigation is enabled;
//! anything else is dropped, not queued.

use std::fmt;

use geoview_core::models::{Announcement, MapMove, ViewportState};

use crate::viewport::ViewportController;

/// Read out when the map surface gains focus
pub const KEYBOARD_INSTRUCTIONS: &str = "Keyboard Navigation: Use arrow keys to pan the map. \
     Press + to zoom in, - to zoom out, Home to reset view.";

/// Zoom levels per key press
const ZOOM_STEP: i32 = 1;

/// Keys the adapter understands, named after DOM `KeyboardEvent.key` values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    Enter,
    Space,
    Escape,
    Char(char),
    Other(String),
}

impl Key {
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "Home" => Key::Home,
            "Enter" => Key::Enter,
            " " | "Space" | "Spacebar" => Key::Space,
            "Escape" | "Esc" => Key::Escape,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Other(other.to_string()),
                }
            }
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c),
            Key::Other(name) => f.write_str(name),
            other => write!(f, "{:?}", other),
        }
    }
}

/// What a key press amounted to
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    /// Unfocused, disabled or unbound
    Ignored,
    /// A viewport command ran and completed; None if nothing moved
    Moved(Option<MapMove>),
    /// Select the feature holding keyboard focus
    Select,
    ClearSelection,
}

#[derive(Debug, Clone)]
pub struct KeyboardAdapter {
    enabled: bool,
    focused: bool,
    pan_step: f64,
    home: ViewportState,
}

impl KeyboardAdapter {
    /// `home` is the view restored by the Home key
    pub fn new(home: ViewportState, pan_step: f64, enabled: bool) -> Self {
        Self { enabled, focused: false, pan_step, home }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Track focus of the map surface. Gaining focus with navigation enabled
    /// yields the instruction announcement.
    pub fn set_focus(&mut self, focused: bool) -> Option<Announcement> {
        let gained = focused && !self.focused;
        self.focused = focused;
        (gained && self.enabled).then(|| Announcement::new(KEYBOARD_INSTRUCTIONS))
    }

    /// Apply one key press. Every viewport command is followed by `move_end`.
    pub fn handle_key(&self, key: &Key, viewport: &mut ViewportController) -> KeyOutcome {
        if !self.enabled || !self.focused {
            tracing::debug!(%key, enabled = self.enabled, focused = self.focused, "Key ignored");
            return KeyOutcome::Ignored;
        }

        let step = self.pan_step;
        match key {
            Key::ArrowUp => viewport.pan_by(0.0, -step),
            Key::ArrowDown => viewport.pan_by(0.0, step),
            Key::ArrowLeft => viewport.pan_by(-step, 0.0),
            Key::ArrowRight => viewport.pan_by(step, 0.0),
            Key::Char('+') | Key::Char('=') => {
                viewport.set_zoom(viewport.state().zoom as i32 + ZOOM_STEP)
            }
            Key::Char('-') | Key::Char('_') => {
                viewport.set_zoom(viewport.state().zoom as i32 - ZOOM_STEP)
            }
            Key::Home => viewport.set_view(self.home.center, self.home.zoom as i32),
            Key::Enter | Key::Space => return KeyOutcome::Select,
            Key::Escape => return KeyOutcome::ClearSelection,
            _ => return KeyOutcome::Ignored,
        }
        KeyOutcome::Moved(viewport.move_end())
    }
}
