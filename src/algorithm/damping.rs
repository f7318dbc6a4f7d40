use glam::DVec3;

pub fn ease_out_cubic(t: f64) -> f64 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    1.0 - (1.0 - t).powi(3)
}

/// Fraction of the remaining distance covered in `dt` seconds by an
/// exponential approach with time constant `time_constant`.
pub fn exp_damping_factor(time_constant: f64, dt: f64) -> f64 {
    if !(dt > 0.0) || !dt.is_finite() {
        return 0.0;
    }
    if !(time_constant > 0.0) {
        return 1.0;
    }
    1.0 - (-dt / time_constant).exp()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DampedPoint {
    pub current: DVec3,
    pub velocity: DVec3,
    max_speed: Option<f64>,
}

impl DampedPoint {
    pub fn new(current: DVec3, max_speed: Option<f64>) -> Self {
        Self {
            current,
            velocity: DVec3::ZERO,
            max_speed: max_speed.filter(|limit| limit.is_finite() && *limit > 0.0),
        }
    }

    /// Advances one tick toward `target`. A zero or invalid `dt` leaves the
    /// point untouched.
    pub fn tick(&mut self, target: DVec3, time_constant: f64, dt: f64) -> DVec3 {
        let factor = exp_damping_factor(time_constant, dt);
        if factor <= 0.0 {
            return self.current;
        }

        let mut velocity = (target - self.current) * factor / dt;
        if let Some(limit) = self.max_speed {
            velocity = velocity.clamp(DVec3::splat(-limit), DVec3::splat(limit));
        }
        self.velocity = velocity;
        self.current += velocity * dt;
        self.current
    }

    pub fn snap_to(&mut self, value: DVec3) {
        self.current = value;
        self.velocity = DVec3::ZERO;
    }
}
