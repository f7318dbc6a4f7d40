use thiserror::Error;

/// Construction-time failures. Runtime event handling never errors; defects
/// there are clamped and logged instead.
#[derive(Debug, Error)]
pub enum TourError {
    #[error("invalid viewpoint table: {0}")]
    InvalidViewpoints(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
