//! State published to UI consumers once per render tick.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Rounds to two decimal places, the precision used for every published coordinate.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Camera pose as published: rounded `[x, y, z]` arrays.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PublishedPose {
    pub position: [f64; 3],
    pub target: [f64; 3],
}

impl PublishedPose {
    pub fn from_vectors(position: DVec3, target: DVec3) -> Self {
        Self {
            position: position.to_array().map(round2),
            target: target.to_array().map(round2),
        }
    }
}

/// Read-only view of the tour for progress bars, section dots, the
/// diagnostics readout and caption text.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourSnapshot {
    pub current_section: usize,
    pub section_progress: f64,
    pub total_sections: usize,
    pub current_camera_position: PublishedPose,
}

impl TourSnapshot {
    /// Overall tour progress in percent, `[0, 100]`.
    pub fn progress_percent(&self) -> f64 {
        if self.total_sections < 2 {
            return 0.0;
        }
        let span = (self.total_sections - 1) as f64;
        ((self.current_section as f64 + self.section_progress) / span * 100.0).clamp(0.0, 100.0)
    }

    /// One-based `"k / N"` label.
    pub fn section_label(&self) -> String {
        format!("{} / {}", self.current_section + 1, self.total_sections)
    }
}
