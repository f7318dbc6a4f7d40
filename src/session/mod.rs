pub mod timers;
pub mod tour;

pub use tour::TourSession;
