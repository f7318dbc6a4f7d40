use crate::algorithm::camera_path::{CameraPathInterpolator, CameraPose, CameraState};
use crate::algorithm::damping::ease_out_cubic;
use crate::models::config::CameraConfig;
use crate::models::viewpoint::ViewpointTable;

/// Distance under which the camera already counts as resting on the first viewpoint.
const AT_START_EPSILON: f64 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransitionState {
    pub active: bool,
    pub progress: f64,
}

#[derive(Debug, Clone)]
pub struct LoopTransitionBlender {
    rate: f64,
    armed_from: Option<CameraPose>,
    from: Option<CameraPose>,
}

impl LoopTransitionBlender {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            rate: config.loop_blend_rate,
            armed_from: None,
            from: None,
        }
    }

    /// Records the pose captured right before the scroll offset jumped to 0.
    /// The blend starts on the next tick that still sees section 0 at progress 0.
    pub fn arm(&mut self, pre_reset: CameraPose) {
        self.armed_from = Some(pre_reset);
    }

    pub fn cancel(&mut self, camera: &mut CameraState) {
        self.armed_from = None;
        if self.from.take().is_some() {
            log::debug!("loop_blend: cancelled at progress={:.3}", camera.transition.progress);
        }
        camera.transition = TransitionState::default();
    }

    /// Drives the camera for one tick if the blend is running. Returns false
    /// when the regular path should run instead.
    pub fn tick(
        &mut self,
        camera: &mut CameraState,
        interpolator: &CameraPathInterpolator,
        table: &ViewpointTable,
        section: usize,
        progress: f64,
        dt: f64,
    ) -> bool {
        let at_loop_start = section == 0 && progress == 0.0;
        let start_pose = CameraPose::from(table.first());

        if let Some(pre_reset) = self.armed_from.take() {
            if at_loop_start && !camera.pose().abs_diff_eq(&start_pose, AT_START_EPSILON) {
                self.from = Some(pre_reset);
                camera.transition = TransitionState {
                    active: true,
                    progress: 0.0,
                };
                log::info!("loop_blend: started");
            }
        }

        let Some(from) = self.from else {
            return false;
        };
        if !at_loop_start {
            self.cancel(camera);
            return false;
        }

        let advanced = if dt > 0.0 && dt.is_finite() {
            camera.transition.progress + dt * self.rate
        } else {
            camera.transition.progress
        };
        camera.transition.progress = advanced.min(1.0);

        let goal = CameraPose::lerp(from, start_pose, ease_out_cubic(camera.transition.progress));
        interpolator.drive_toward(camera, goal, dt, false);

        if camera.transition.progress >= 1.0 {
            self.from = None;
            camera.transition.active = false;
            log::info!("loop_blend: finished");
        }
        true
    }
}
