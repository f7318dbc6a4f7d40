//! Input events delivered by the host and the commands sent back to it.

use serde::{Deserialize, Serialize};

use crate::models::config::{KeyBindings, ScrollBehavior};

/// One input event from the host page or window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostEvent {
    /// Document scroll position changed.
    Scroll {
        #[serde(rename = "offsetPx", alias = "offset_px")]
        offset_px: f64,
    },
    /// Raw wheel input, before the document scrolls.
    Wheel {
        #[serde(rename = "deltaY", alias = "delta_y")]
        delta_y: f64,
    },
    KeyDown { key: String },
    /// Viewport height changed (px).
    Resize {
        #[serde(rename = "viewportHeight", alias = "viewport_height")]
        viewport_height: f64,
    },
    /// Pointer drag while orbiting, in pixels.
    OrbitDrag { dx: f64, dy: f64 },
    /// Zoom gesture while orbiting; positive moves away from the orbit target.
    OrbitZoom { delta: f64 },
    /// Section indicator click.
    JumpToSection { index: usize },
}

/// What the host should do with the native event after the tour saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    /// The tour used the event; suppress the default action.
    Consumed,
    /// The tour observed the event; let the default action proceed.
    PassThrough,
    /// The tour did not act on the event.
    Ignored,
}

/// Programmatic scroll the host must perform on the document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollCommand {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

/// View-relative translation direction in free-look.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Forward,
    Back,
    Left,
    Right,
}

/// Bound key action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    ToggleFreeLook,
    Move(MoveDirection),
    LogPose,
}

impl KeyBindings {
    pub fn resolve(&self, key: &str) -> Option<KeyAction> {
        let matches = |binding: &str| binding.eq_ignore_ascii_case(key);
        if matches(&self.toggle_free_look) {
            Some(KeyAction::ToggleFreeLook)
        } else if matches(&self.forward) {
            Some(KeyAction::Move(MoveDirection::Forward))
        } else if matches(&self.back) {
            Some(KeyAction::Move(MoveDirection::Back))
        } else if matches(&self.left) {
            Some(KeyAction::Move(MoveDirection::Left))
        } else if matches(&self.right) {
            Some(KeyAction::Move(MoveDirection::Right))
        } else if matches(&self.log_pose) {
            Some(KeyAction::LogPose)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_default_bindings_case_insensitively() {
        let keys = KeyBindings::default();
        assert_eq!(keys.resolve("O"), Some(KeyAction::ToggleFreeLook));
        assert_eq!(
            keys.resolve("w"),
            Some(KeyAction::Move(MoveDirection::Forward))
        );
        assert_eq!(keys.resolve("D"), Some(KeyAction::Move(MoveDirection::Right)));
        assert_eq!(keys.resolve("p"), Some(KeyAction::LogPose));
        assert_eq!(keys.resolve("x"), None);
    }

    #[test]
    fn deserializes_tagged_events_with_legacy_field_names() {
        let scroll: HostEvent =
            serde_json::from_str(r#"{"type":"scroll","offsetPx":4400.0}"#).expect("scroll");
        let wheel: HostEvent =
            serde_json::from_str(r#"{"type":"wheel","delta_y":120.0}"#).expect("wheel");
        let jump: HostEvent =
            serde_json::from_str(r#"{"type":"jumpToSection","index":3}"#).expect("jump");

        assert_eq!(scroll, HostEvent::Scroll { offset_px: 4400.0 });
        assert_eq!(wheel, HostEvent::Wheel { delta_y: 120.0 });
        assert_eq!(jump, HostEvent::JumpToSection { index: 3 });
    }

    #[test]
    fn serializes_scroll_command_in_camel_case() {
        let command = ScrollCommand {
            top: 800.0,
            behavior: ScrollBehavior::Smooth,
        };
        let json = serde_json::to_string(&command).expect("serialize command");
        assert_eq!(json, r#"{"top":800.0,"behavior":"smooth"}"#);
    }
}
