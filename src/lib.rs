pub mod algorithm;
pub mod host;
pub mod models;
pub mod session;
pub mod telemetry;

pub use algorithm::camera_path::{CameraMode, CameraPose, CameraRig, PerspectiveRig};
pub use host::driver::{run, DriverOptions};
pub use models::config::TourConfig;
pub use models::events::{EventDisposition, HostEvent, ScrollCommand};
pub use models::snapshot::TourSnapshot;
pub use models::viewpoint::{Viewpoint, ViewpointTable};
pub use models::TourError;
pub use session::TourSession;

/// Installs the `env_logger` backend, defaulting to `info` when `RUST_LOG`
/// is unset. Returns false if a logger was already installed.
pub fn init_logging() -> bool {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init()
        .is_ok()
}
