//! Tour configuration (config.json).
//!
//! Every section is defaulted field by field, so a host may supply only the
//! values it wants to override.

use serde::{Deserialize, Serialize};

use crate::models::TourError;

/// How the host should perform a programmatic scroll.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    /// Jump immediately.
    Auto,
    #[default]
    Smooth,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ScrollConfig {
    /// Quiet period after the last scroll input before snapping (ms).
    pub snap_delay_ms: u64,
    pub enable_snapping: bool,
    /// Distance from a section boundary, as a fraction of a section, inside
    /// which the snap always goes to that boundary. Must lie in (0, 0.5).
    pub snap_threshold: f64,
    pub scroll_behavior: ScrollBehavior,
    /// Loop trigger distance from the end of the document for scroll events (px).
    pub scroll_edge_epsilon_px: f64,
    /// Loop trigger distance from the end of the document for forward wheel input (px).
    pub wheel_edge_epsilon_px: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            snap_delay_ms: 300,
            enable_snapping: true,
            snap_threshold: 0.1,
            scroll_behavior: ScrollBehavior::Smooth,
            scroll_edge_epsilon_px: 20.0,
            wheel_edge_epsilon_px: 50.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CameraConfig {
    /// Time constant (s) for the position approach.
    pub position_damping: f64,
    /// Time constant (s) for the look-at approach.
    pub target_damping: f64,
    pub enable_smoothing: bool,
    /// Per-axis position speed limit (world units / s). This is a real clamp:
    /// a small value such as 0.5 visibly throttles section transitions.
    pub max_position_speed: f64,
    /// Multiplier on both time constants while progress is near 0.5.
    pub midpoint_damping_boost: f64,
    /// Loop transition progress gained per second.
    pub loop_blend_rate: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position_damping: 0.15,
            target_damping: 0.2,
            enable_smoothing: true,
            max_position_speed: 60.0,
            midpoint_damping_boost: 1.5,
            loop_blend_rate: 1.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FreeLookConfig {
    /// Translation per directional key press (world units).
    pub move_speed: f64,
    /// Orbit rotation per dragged pixel (radians).
    pub orbit_sensitivity: f64,
    /// Fractional distance change per zoom delta unit.
    pub zoom_sensitivity: f64,
    pub min_distance: f64,
    pub max_distance: f64,
}

impl Default for FreeLookConfig {
    fn default() -> Self {
        Self {
            move_speed: 0.5,
            orbit_sensitivity: 0.005,
            zoom_sensitivity: 0.001,
            min_distance: 1.0,
            max_distance: 80.0,
        }
    }
}

/// Key names as delivered by the host, compared case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyBindings {
    pub toggle_free_look: String,
    pub forward: String,
    pub back: String,
    pub left: String,
    pub right: String,
    pub log_pose: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            toggle_free_look: "o".to_string(),
            forward: "w".to_string(),
            back: "s".to_string(),
            left: "a".to_string(),
            right: "d".to_string(),
            log_pose: "p".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct LoopResetConfig {
    /// Time the terminal pose is held before the offset jumps back to 0 (ms).
    pub commit_delay_ms: u64,
    /// Time after the jump before scroll input is accepted again (ms).
    pub release_delay_ms: u64,
}

impl Default for LoopResetConfig {
    fn default() -> Self {
        Self {
            commit_delay_ms: 100,
            release_delay_ms: 50,
        }
    }
}

/// Root object of config.json.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TourConfig {
    pub scroll: ScrollConfig,
    pub camera: CameraConfig,
    pub free_look: FreeLookConfig,
    pub keys: KeyBindings,
    pub loop_reset: LoopResetConfig,
}

impl TourConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, TourError> {
        let config: TourConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TourError> {
        let threshold = self.scroll.snap_threshold;
        if !(threshold.is_finite() && threshold > 0.0 && threshold < 0.5) {
            return Err(TourError::InvalidConfig(format!(
                "scroll.snapThreshold must lie in (0, 0.5), got {threshold}"
            )));
        }

        let positive = [
            ("scroll.scrollEdgeEpsilonPx", self.scroll.scroll_edge_epsilon_px),
            ("scroll.wheelEdgeEpsilonPx", self.scroll.wheel_edge_epsilon_px),
            ("camera.positionDamping", self.camera.position_damping),
            ("camera.targetDamping", self.camera.target_damping),
            ("camera.maxPositionSpeed", self.camera.max_position_speed),
            ("camera.midpointDampingBoost", self.camera.midpoint_damping_boost),
            ("camera.loopBlendRate", self.camera.loop_blend_rate),
            ("freeLook.moveSpeed", self.free_look.move_speed),
            ("freeLook.orbitSensitivity", self.free_look.orbit_sensitivity),
            ("freeLook.zoomSensitivity", self.free_look.zoom_sensitivity),
            ("freeLook.minDistance", self.free_look.min_distance),
            ("freeLook.maxDistance", self.free_look.max_distance),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TourError::InvalidConfig(format!(
                    "{name} must be strictly positive, got {value}"
                )));
            }
        }

        if self.free_look.min_distance > self.free_look.max_distance {
            return Err(TourError::InvalidConfig(format!(
                "freeLook.minDistance ({}) exceeds freeLook.maxDistance ({})",
                self.free_look.min_distance, self.free_look.max_distance
            )));
        }

        Ok(())
    }
}
