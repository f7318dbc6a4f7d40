use glam::{DMat4, DVec3};
use serde::Serialize;

use crate::algorithm::damping::{ease_out_cubic, DampedPoint};
use crate::algorithm::loop_blend::TransitionState;
use crate::models::config::CameraConfig;
use crate::models::viewpoint::{Viewpoint, ViewpointTable};

/// Half-width of the progress window around 0.5 that gets extra smoothing.
const MIDPOINT_WINDOW: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CameraMode {
    #[default]
    Automatic,
    FreeLook,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: DVec3,
    pub look_at: DVec3,
}

impl CameraPose {
    pub fn lerp(from: CameraPose, to: CameraPose, t: f64) -> CameraPose {
        CameraPose {
            position: from.position.lerp(to.position, t),
            look_at: from.look_at.lerp(to.look_at, t),
        }
    }

    pub fn abs_diff_eq(&self, other: &CameraPose, max_abs_diff: f64) -> bool {
        self.position.abs_diff_eq(other.position, max_abs_diff)
            && self.look_at.abs_diff_eq(other.look_at, max_abs_diff)
    }
}

impl From<Viewpoint> for CameraPose {
    fn from(viewpoint: Viewpoint) -> Self {
        Self {
            position: viewpoint.position,
            look_at: viewpoint.target,
        }
    }
}

pub trait CameraRig {
    fn apply_pose(&mut self, pose: &CameraPose);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveRig {
    pub position: DVec3,
    pub look_at: DVec3,
    pub view: DMat4,
}

impl Default for PerspectiveRig {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            look_at: DVec3::NEG_Z,
            view: DMat4::IDENTITY,
        }
    }
}

impl CameraRig for PerspectiveRig {
    fn apply_pose(&mut self, pose: &CameraPose) {
        self.position = pose.position;
        self.look_at = pose.look_at;

        let forward = pose.look_at - pose.position;
        // look_at_rh degenerates when the eye sits on its target or looks straight along Y.
        if forward.length_squared() > 1e-12 && forward.normalize().cross(DVec3::Y).length_squared() > 1e-12 {
            self.view = DMat4::look_at_rh(pose.position, pose.look_at, DVec3::Y);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: DampedPoint,
    pub look_at: DampedPoint,
    pub mode: CameraMode,
    pub transition: TransitionState,
}

impl CameraState {
    pub fn new(start: Viewpoint, config: &CameraConfig) -> Self {
        Self {
            position: DampedPoint::new(start.position, Some(config.max_position_speed)),
            look_at: DampedPoint::new(start.target, None),
            mode: CameraMode::Automatic,
            transition: TransitionState::default(),
        }
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.position.current,
            look_at: self.look_at.current,
        }
    }

    pub fn velocity(&self) -> DVec3 {
        self.position.velocity
    }

    pub fn snap_to(&mut self, pose: CameraPose) {
        self.position.snap_to(pose.position);
        self.look_at.snap_to(pose.look_at);
    }
}

/// Pre-damping pose for `section` at `progress`, eased with a cubic ease-out.
/// The final (duplicate) section holds the terminal pose.
pub fn interpolated_pose(table: &ViewpointTable, section: usize, progress: f64) -> CameraPose {
    let last = table.last_index();
    if section >= last {
        return table.get(last).into();
    }

    let current = CameraPose::from(table.get(section));
    let next = CameraPose::from(table.get((section + 1) % last));
    CameraPose::lerp(current, next, ease_out_cubic(progress))
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraPathInterpolator {
    position_damping: f64,
    target_damping: f64,
    enable_smoothing: bool,
    midpoint_boost: f64,
}

impl CameraPathInterpolator {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            position_damping: config.position_damping,
            target_damping: config.target_damping,
            enable_smoothing: config.enable_smoothing,
            midpoint_boost: config.midpoint_damping_boost,
        }
    }

    /// Moves the camera one tick along the path. Returns false, touching
    /// nothing, in free-look mode.
    pub fn tick(
        &self,
        camera: &mut CameraState,
        table: &ViewpointTable,
        section: usize,
        progress: f64,
        dt: f64,
    ) -> bool {
        if camera.mode == CameraMode::FreeLook {
            return false;
        }
        let goal = interpolated_pose(table, section, progress);
        let near_midpoint = (progress - 0.5).abs() < MIDPOINT_WINDOW;
        self.drive_toward(camera, goal, dt, near_midpoint);
        true
    }

    pub fn drive_toward(&self, camera: &mut CameraState, goal: CameraPose, dt: f64, near_midpoint: bool) {
        if !self.enable_smoothing {
            camera.snap_to(goal);
            return;
        }

        let boost = if near_midpoint { self.midpoint_boost } else { 1.0 };
        camera
            .position
            .tick(goal.position, self.position_damping * boost, dt);
        camera
            .look_at
            .tick(goal.look_at, self.target_damping * boost, dt);
    }
}
