use glam::DVec3;

use crate::algorithm::camera_path::CameraPose;
use crate::models::config::FreeLookConfig;
use crate::models::events::MoveDirection;

const MIN_PHI: f64 = 0.05;
const MAX_PHI: f64 = std::f64::consts::PI - 0.05;
const MIN_ORBIT_RADIUS: f64 = 1e-6;

#[derive(Debug, Clone)]
pub struct FreeLookController {
    position: DVec3,
    target: DVec3,
    move_speed: f64,
    orbit_sensitivity: f64,
    zoom_sensitivity: f64,
    min_distance: f64,
    max_distance: f64,
}

impl FreeLookController {
    pub fn new(config: &FreeLookConfig, pose: CameraPose) -> Self {
        Self {
            position: pose.position,
            target: pose.look_at,
            move_speed: config.move_speed,
            orbit_sensitivity: config.orbit_sensitivity,
            zoom_sensitivity: config.zoom_sensitivity,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
        }
    }

    pub fn engage(&mut self, pose: CameraPose) {
        self.position = pose.position;
        self.target = pose.look_at;
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.position,
            look_at: self.target,
        }
    }

    /// Moves camera and orbit target together by one step along the
    /// horizontal view axes.
    pub fn translate(&mut self, direction: MoveDirection) {
        let forward = self.horizontal_forward();
        let right = forward.cross(DVec3::Y).normalize_or_zero();
        let axis = match direction {
            MoveDirection::Forward => forward,
            MoveDirection::Back => -forward,
            MoveDirection::Right => right,
            MoveDirection::Left => -right,
        };
        let step = axis * self.move_speed;
        self.position += step;
        self.target += step;
    }

    pub fn orbit(&mut self, dx: f64, dy: f64) {
        if !(dx.is_finite() && dy.is_finite()) {
            return;
        }
        let offset = self.position - self.target;
        let radius = offset.length();
        if radius < MIN_ORBIT_RADIUS {
            return;
        }

        let theta = offset.z.atan2(offset.x) + dx * self.orbit_sensitivity;
        let phi = ((offset.y / radius).clamp(-1.0, 1.0).acos() - dy * self.orbit_sensitivity)
            .clamp(MIN_PHI, MAX_PHI);
        self.position = self.target + spherical_offset(radius, theta, phi);
    }

    /// Dollies toward (negative) or away from (positive) the target.
    pub fn zoom(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        let offset = self.position - self.target;
        let radius = offset.length();
        if radius < MIN_ORBIT_RADIUS {
            return;
        }
        let next = (radius * (1.0 + delta * self.zoom_sensitivity))
            .clamp(self.min_distance, self.max_distance);
        self.position = self.target + offset / radius * next;
    }

    fn horizontal_forward(&self) -> DVec3 {
        let mut forward = self.target - self.position;
        forward.y = 0.0;
        let forward = forward.normalize_or_zero();
        if forward == DVec3::ZERO {
            DVec3::NEG_Z
        } else {
            forward
        }
    }
}

fn spherical_offset(radius: f64, theta: f64, phi: f64) -> DVec3 {
    let sin_phi = phi.sin();
    DVec3::new(
        radius * sin_phi * theta.cos(),
        radius * phi.cos(),
        radius * sin_phi * theta.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> FreeLookController {
        FreeLookController::new(
            &FreeLookConfig::default(),
            CameraPose {
                position: DVec3::new(0.0, 2.0, 10.0),
                look_at: DVec3::ZERO,
            },
        )
    }

    #[test]
    fn forward_moves_along_horizontal_view_direction() {
        let mut free_look = controller();
        free_look.translate(MoveDirection::Forward);
        let pose = free_look.pose();
        assert!((pose.position - DVec3::new(0.0, 2.0, 9.5)).length() < 1e-12);
        assert!((pose.look_at - DVec3::new(0.0, 0.0, -0.5)).length() < 1e-12);
    }

    #[test]
    fn strafing_is_perpendicular_to_view() {
        let mut free_look = controller();
        free_look.translate(MoveDirection::Right);
        assert!((free_look.pose().position - DVec3::new(0.5, 2.0, 10.0)).length() < 1e-12);
        free_look.translate(MoveDirection::Left);
        free_look.translate(MoveDirection::Left);
        assert!((free_look.pose().position - DVec3::new(-0.5, 2.0, 10.0)).length() < 1e-12);
    }

    #[test]
    fn orbit_preserves_distance_to_target() {
        let mut free_look = controller();
        let before = free_look.pose().position.distance(DVec3::ZERO);
        free_look.orbit(120.0, -40.0);
        let pose = free_look.pose();
        assert!((pose.position.distance(DVec3::ZERO) - before).abs() < 1e-9);
        assert_eq!(pose.look_at, DVec3::ZERO);
        assert!(pose.position.x.abs() > 1e-3);
    }

    #[test]
    fn orbit_pitch_stops_short_of_pole() {
        let mut free_look = controller();
        free_look.orbit(0.0, 100_000.0);
        let offset = free_look.pose().position;
        let phi = (offset.y / offset.length()).acos();
        assert!(phi >= MIN_PHI - 1e-9);
    }

    #[test]
    fn zoom_clamps_to_configured_range() {
        let mut free_look = controller();
        free_look.zoom(-10_000.0);
        assert!((free_look.pose().position.length() - 1.0).abs() < 1e-9);
        free_look.zoom(1_000_000.0);
        assert!((free_look.pose().position.length() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn vertical_view_falls_back_to_negative_z() {
        let mut free_look = FreeLookController::new(
            &FreeLookConfig::default(),
            CameraPose {
                position: DVec3::new(0.0, 10.0, 0.0),
                look_at: DVec3::ZERO,
            },
        );
        free_look.translate(MoveDirection::Forward);
        assert!((free_look.pose().position - DVec3::new(0.0, 10.0, -0.5)).length() < 1e-12);
    }
}
