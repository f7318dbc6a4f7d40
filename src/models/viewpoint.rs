//! Keyframe viewpoints visited by the tour.
//!
//! The table is a closed loop: the last entry repeats the first so the camera
//! path returns to its starting pose before the scroll offset wraps.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::models::TourError;

/// Tolerance used when checking that the loop closes.
const LOOP_CLOSURE_EPSILON: f64 = 1e-9;

/// Fixed camera position plus look-at target for one tour stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewpoint {
    pub position: DVec3,
    pub target: DVec3,
}

impl Viewpoint {
    pub const fn new(position: [f64; 3], target: [f64; 3]) -> Self {
        Self {
            position: DVec3::new(position[0], position[1], position[2]),
            target: DVec3::new(target[0], target[1], target[2]),
        }
    }

    fn is_finite(&self) -> bool {
        self.position.is_finite() && self.target.is_finite()
    }

    fn approx_eq(&self, other: &Viewpoint) -> bool {
        self.position.abs_diff_eq(other.position, LOOP_CLOSURE_EPSILON)
            && self.target.abs_diff_eq(other.target, LOOP_CLOSURE_EPSILON)
    }
}

/// Ordered, immutable sequence of viewpoints with `first == last`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ViewpointTable {
    viewpoints: Vec<Viewpoint>,
}

impl ViewpointTable {
    pub fn new(viewpoints: Vec<Viewpoint>) -> Result<Self, TourError> {
        if viewpoints.len() < 2 {
            return Err(TourError::InvalidViewpoints(format!(
                "expected at least 2 viewpoints, got {}",
                viewpoints.len()
            )));
        }
        if let Some(idx) = viewpoints.iter().position(|vp| !vp.is_finite()) {
            return Err(TourError::InvalidViewpoints(format!(
                "viewpoint {idx} has non-finite coordinates"
            )));
        }
        let first = viewpoints[0];
        let last = viewpoints[viewpoints.len() - 1];
        if !first.approx_eq(&last) {
            return Err(TourError::InvalidViewpoints(
                "first and last viewpoints must match to close the loop".to_string(),
            ));
        }
        Ok(Self { viewpoints })
    }

    /// Parses a JSON array of `{ "position": [x,y,z], "target": [x,y,z] }`.
    pub fn from_json_str(raw: &str) -> Result<Self, TourError> {
        let viewpoints: Vec<Viewpoint> = serde_json::from_str(raw)?;
        Self::new(viewpoints)
    }

    /// Thirteen-stop orbit around the showcase car, starting and ending on the
    /// license-plate view.
    pub fn gnx_showcase() -> Self {
        Self {
            viewpoints: GNX_SHOWCASE.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.viewpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.viewpoints.is_empty()
    }

    /// Index of the final (duplicate) viewpoint.
    pub fn last_index(&self) -> usize {
        self.viewpoints.len() - 1
    }

    /// Returns the viewpoint at `index`, clamping out-of-range indices to the
    /// last entry.
    pub fn get(&self, index: usize) -> Viewpoint {
        self.viewpoints[index.min(self.last_index())]
    }

    pub fn first(&self) -> Viewpoint {
        self.viewpoints[0]
    }

    pub fn as_slice(&self) -> &[Viewpoint] {
        &self.viewpoints
    }
}

impl<'de> Deserialize<'de> for ViewpointTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let viewpoints = Vec::<Viewpoint>::deserialize(deserializer)?;
        ViewpointTable::new(viewpoints).map_err(serde::de::Error::custom)
    }
}

impl Default for ViewpointTable {
    fn default() -> Self {
        Self::gnx_showcase()
    }
}

const GNX_SHOWCASE: [Viewpoint; 13] = [
    // License plate, loop start
    Viewpoint::new([9.58, 1.63, -4.11], [1.71, 0.11, -4.26]),
    // Front left
    Viewpoint::new([13.57, 2.4, -4.03], [1.71, 0.11, -4.26]),
    // Side profile
    Viewpoint::new([2.44, 2.68, 11.21], [2.23, 2.06, 4.37]),
    // Rear quarter
    Viewpoint::new([11.39, 2.89, -0.28], [1.01, 0.49, -2.65]),
    // Hood reflection
    Viewpoint::new([-5.78, 1.45, -1.59], [0.96, 0.2, -1.01]),
    // Raised rear
    Viewpoint::new([13.57, 7.0, -4.03], [1.71, 0.11, -4.26]),
    // High-angle lookdown
    Viewpoint::new([10.05, 6.81, -4.17], [1.05, 3.53, -4.5]),
    // Aerial three-quarter
    Viewpoint::new([16.18, 9.35, -15.41], [1.12, 3.64, -9.07]),
    // Front right
    Viewpoint::new([-4.8, 3.26, 3.24], [3.48, 0.69, -6.97]),
    // Overhead
    Viewpoint::new([4.08, 23.05, -6.96], [3.48, 0.69, -6.97]),
    // Low front
    Viewpoint::new([-8.61, 2.98, -12.26], [3.48, 0.69, -6.97]),
    // Rear left
    Viewpoint::new([-6.0, 12.5, -7.0], [-2.0, 1.5, -2.0]),
    // License plate, loop end
    Viewpoint::new([9.58, 1.63, -4.11], [1.71, 0.11, -4.26]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn showcase_table_closes_the_loop() {
        let table = ViewpointTable::gnx_showcase();
        assert_eq!(table.len(), 13);
        assert_eq!(table.get(0), table.get(table.last_index()));
        ViewpointTable::new(table.as_slice().to_vec()).expect("showcase table validates");
    }

    #[test]
    fn get_clamps_out_of_range_index() {
        let table = ViewpointTable::gnx_showcase();
        assert_eq!(table.get(99), table.get(12));
    }

    #[test]
    fn rejects_open_loop() {
        let err = ViewpointTable::new(vec![
            Viewpoint::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            Viewpoint::new([1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ])
        .expect_err("open loop must be rejected");
        assert!(matches!(err, TourError::InvalidViewpoints(_)));
    }

    #[test]
    fn rejects_single_viewpoint() {
        let err = ViewpointTable::new(vec![Viewpoint::new([0.0; 3], [0.0; 3])])
            .expect_err("single viewpoint must be rejected");
        assert!(matches!(err, TourError::InvalidViewpoints(_)));
    }

    #[test]
    fn loads_array_form_from_json() {
        let raw = r#"[
            { "position": [1.0, 2.0, 3.0], "target": [0.0, 0.0, 0.0] },
            { "position": [4.0, 5.0, 6.0], "target": [0.0, 1.0, 0.0] },
            { "position": [1.0, 2.0, 3.0], "target": [0.0, 0.0, 0.0] }
        ]"#;
        let table = ViewpointTable::from_json_str(raw).expect("parse table");
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(1).position, DVec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn json_open_loop_is_rejected_during_deserialization() {
        let raw = r#"[
            { "position": [1.0, 2.0, 3.0], "target": [0.0, 0.0, 0.0] },
            { "position": [4.0, 5.0, 6.0], "target": [0.0, 1.0, 0.0] }
        ]"#;
        assert!(serde_json::from_str::<ViewpointTable>(raw).is_err());
    }
}
