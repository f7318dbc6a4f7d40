pub mod captions;
pub mod config;
pub mod error;
pub mod events;
pub mod snapshot;
pub mod viewpoint;

pub use error::TourError;
